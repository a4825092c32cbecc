mod articles;
mod delivery;
mod home;
mod reminders;
mod render;
mod settings;
mod tools;
mod util;

use std::sync::Arc;

use reminders::AddingReminderState;
use teloxide::{
    dispatching::dialogue, dispatching::dialogue::InMemStorage, dptree::case, prelude::*,
    utils::command::BotCommands,
};

use crate::profiles::{Profile, Profiles};

pub use delivery::{PermissionPrompts, TelegramProfileFactory};

type GlobalDialogue = Dialogue<GlobalState, InMemStorage<GlobalState>>;
type HandlerResult = anyhow::Result<()>;

#[derive(Default, Clone, Debug, PartialEq, Eq)]
enum GlobalState {
    #[default]
    Idle,
    AddingReminder(AddingReminderState),
    ConfirmingRemoval {
        index: usize,
    },
}

pub struct TelegramInteractionInterface;
impl TelegramInteractionInterface {
    pub async fn start(bot: Bot, profiles: Arc<Profiles>, prompts: Arc<PermissionPrompts>) {
        log::info!("Starting Telegram interaction interface");

        if let Err(error) = bot.set_my_commands(Command::bot_commands()).await {
            log::warn!("Could not register bot commands. [error = {error}]");
        }

        let cancel_handler = Update::filter_message().branch(
            teloxide::filter_command::<Command, _>().branch(case![Command::Cancel].endpoint(cancel)),
        );

        let invalid_state_handler =
            Update::filter_message().branch(dptree::endpoint(invalid_state));

        let invalid_callback_handler =
            Update::filter_callback_query().branch(dptree::endpoint(invalid_query));

        let schema = dialogue::enter::<Update, InMemStorage<GlobalState>, GlobalState, _>()
            .filter_map_async(load_profile)
            .branch(cancel_handler)
            .branch(home::schema())
            .branch(reminders::schema())
            .branch(tools::schema())
            .branch(articles::schema())
            .branch(settings::schema())
            .branch(reminders::dialogue_schema())
            .branch(invalid_state_handler)
            .branch(invalid_callback_handler);

        Dispatcher::builder(bot, schema)
            .dependencies(dptree::deps![
                InMemStorage::<GlobalState>::new(),
                profiles,
                prompts
            ])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await
    }
}

async fn load_profile(update: Update, profiles: Arc<Profiles>) -> Option<Arc<Profile>> {
    let chat_id = update.chat()?.id;

    match profiles.get_or_start(chat_id.0).await {
        Ok(profile) => Some(profile),
        Err(error) => {
            log::error!("Could not start profile for chat. [chat_id = {chat_id}, error = {error}]");
            None
        }
    }
}

async fn cancel(bot: Bot, dialogue: GlobalDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, "Cancelled current operation.")
        .await?;
    dialogue.exit().await?;
    Ok(())
}

async fn invalid_state(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(
        msg.chat.id,
        "Unable to handle the message. Please try again, see /help or use /cancel to stop current operation.",
    )
    .await?;
    Ok(())
}

async fn invalid_query(bot: Bot, dialogue: GlobalDialogue, query: CallbackQuery) -> HandlerResult {
    bot.answer_callback_query(query.id).await?;
    bot.send_message(
        dialogue.chat_id(),
        "Unable to handle the query result. Please try again or use /cancel to stop current operation.",
    ).await?;

    Ok(())
}

#[derive(BotCommands, Clone)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
enum Command {
    #[command(description = "welcome message and daily summary")]
    Start,
    #[command(description = "show this help")]
    Help,
    #[command(description = "daily summary")]
    Home,
    #[command(description = "list medicine reminders")]
    Reminders,
    #[command(description = "add a medicine reminder")]
    AddReminder,
    #[command(description = "mark the nearest dose of reminder N as taken")]
    Take(String),
    #[command(description = "remove reminder N")]
    Remove(String),
    #[command(description = "add a glass of water, or the given ml")]
    Water(String),
    #[command(description = "set the daily water target in ml")]
    WaterTarget(String),
    #[command(description = "BMI from <height cm> <weight kg>")]
    Bmi(String),
    #[command(description = "daily calories from <age> <male|female> <height cm> <weight kg> <activity>")]
    Calories(String),
    #[command(description = "record <great|good|okay|bad|awful> [notes]")]
    Mood(String),
    #[command(description = "mood history")]
    Moods,
    #[command(description = "list emergency contacts")]
    Contacts,
    #[command(description = "add an emergency contact: <name> <number>")]
    AddContact(String),
    #[command(description = "remove emergency contact N")]
    RemoveContact(String),
    #[command(description = "show your profile")]
    Profile,
    #[command(description = "save <name> <YYYY-MM-DD> <male|female>")]
    SetProfile(String),
    #[command(description = "health articles by category, or your favorites")]
    Articles(String),
    #[command(description = "search articles")]
    Search(String),
    #[command(description = "read article by id")]
    Article(String),
    #[command(description = "toggle article as favourite")]
    Favorite(String),
    #[command(description = "notification status, or turn them on|off")]
    Notifications(String),
    #[command(description = "cancel the current operation")]
    Cancel,
}
