use std::sync::Arc;

use teloxide::{
    dispatching::UpdateHandler,
    dptree::case,
    filter_command,
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup},
};

use crate::{
    profiles::{Profile, Profiles},
    reminder::NewReminder,
    tracker::{TakeOutcome, parse_position},
};

use super::{
    Command, GlobalDialogue, GlobalState, HandlerResult, render,
    util::{keyboard, settle_query},
};

const CONFIRM_REMOVAL: &str = "remove:confirm";
const CANCEL_REMOVAL: &str = "remove:cancel";

#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub(super) enum AddingReminderState {
    #[default]
    WaitingForName,
    WaitingForDose {
        name: String,
    },
    WaitingForSchedule {
        name: String,
        dose: String,
    },
}

/// Callback payloads of the reminder list and the removal prompt.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(super) enum ReminderAction {
    Take(usize),
    Remove(usize),
    ConfirmRemoval,
    CancelRemoval,
}

impl ReminderAction {
    pub(super) fn data(&self) -> String {
        match self {
            Self::Take(index) => format!("take:{index}"),
            Self::Remove(index) => format!("remove:{index}"),
            Self::ConfirmRemoval => CONFIRM_REMOVAL.to_string(),
            Self::CancelRemoval => CANCEL_REMOVAL.to_string(),
        }
    }

    pub(super) fn parse(data: &str) -> Option<Self> {
        match data.split_once(':')? {
            ("remove", "confirm") => Some(Self::ConfirmRemoval),
            ("remove", "cancel") => Some(Self::CancelRemoval),
            ("take", index) => index.parse().ok().map(Self::Take),
            ("remove", index) => index.parse().ok().map(Self::Remove),
            _ => None,
        }
    }

    fn answers_removal_prompt(&self) -> bool {
        matches!(self, Self::ConfirmRemoval | Self::CancelRemoval)
    }
}

async fn add_reminder_start(bot: Bot, dialogue: GlobalDialogue, msg: Message) -> HandlerResult {
    bot.send_message(
        msg.chat.id,
        "Adding a new medicine reminder! Please enter the medicine name. If you want to cancel, use the /cancel command.",
    )
    .await?;

    dialogue
        .update(GlobalState::AddingReminder(
            AddingReminderState::WaitingForName,
        ))
        .await?;

    Ok(())
}

fn non_empty_text(msg: &Message) -> Option<&str> {
    msg.text().map(str::trim).filter(|text| !text.is_empty())
}

async fn receive_name(bot: Bot, dialogue: GlobalDialogue, msg: Message) -> HandlerResult {
    match non_empty_text(&msg) {
        Some(name) => {
            bot.send_message(
                msg.chat.id,
                format!("Medicine: {name}\nNow enter the dose (e.g. 1 tablet, 500mg)."),
            )
            .await?;
            dialogue
                .update(GlobalState::AddingReminder(
                    AddingReminderState::WaitingForDose {
                        name: name.to_string(),
                    },
                ))
                .await?;
        }
        None => {
            bot.send_message(msg.chat.id, "Please send me the medicine name.")
                .await?;
        }
    }

    Ok(())
}

async fn receive_dose(
    bot: Bot,
    dialogue: GlobalDialogue,
    name: String,
    msg: Message,
) -> HandlerResult {
    match non_empty_text(&msg) {
        Some(dose) => {
            bot.send_message(
                msg.chat.id,
                "Finally, enter the times to take it, separated by commas or spaces (e.g. 08:00, 20:00).",
            )
            .await?;
            dialogue
                .update(GlobalState::AddingReminder(
                    AddingReminderState::WaitingForSchedule {
                        name,
                        dose: dose.to_string(),
                    },
                ))
                .await?;
        }
        None => {
            bot.send_message(msg.chat.id, "Please send me the dose.")
                .await?;
        }
    }

    Ok(())
}

async fn receive_schedule(
    bot: Bot,
    dialogue: GlobalDialogue,
    (name, dose): (String, String),
    msg: Message,
    profiles: Arc<Profiles>,
    profile: Arc<Profile>,
) -> HandlerResult {
    let new = match NewReminder::parse(&name, &dose, msg.text().unwrap_or_default()) {
        Ok(new) => new,
        Err(error) => {
            bot.send_message(
                msg.chat.id,
                format!("{error}\nThe reminder was not saved. Use /addreminder to start over."),
            )
            .await?;
            dialogue.exit().await?;
            return Ok(());
        }
    };

    let now = profiles.now();
    let mut tracker = profile.tracker.lock().await;
    tracker.add_reminder(new).await?;
    let armed = profile.reschedule(&tracker, now).await;

    log::info!(
        "Added medicine reminder. [chat_id = {}, newly_armed = {armed}]",
        msg.chat.id
    );

    bot.send_message(
        msg.chat.id,
        format!(
            "Reminder saved.\n\n{}",
            render::reminder_list(tracker.reminders(), now)
        ),
    )
    .await?;

    dialogue.exit().await?;
    Ok(())
}

async fn list_reminders(
    bot: Bot,
    msg: Message,
    profiles: Arc<Profiles>,
    profile: Arc<Profile>,
) -> HandlerResult {
    let now = profiles.now();
    let tracker = profile.tracker.lock().await;
    let reminders = tracker.reminders();

    let mut request = bot.send_message(msg.chat.id, render::reminder_list(reminders, now));
    if !reminders.is_empty() {
        request = request.reply_markup(keyboard(render::reminder_controls(reminders, now)));
    }
    request.await?;

    Ok(())
}

async fn take(
    bot: &Bot,
    chat_id: ChatId,
    profiles: &Profiles,
    profile: &Profile,
    index: usize,
) -> HandlerResult {
    let now = profiles.now();
    let mut tracker = profile.tracker.lock().await;

    let outcome = tracker.take_reminder(index, now).await?;
    if matches!(outcome, TakeOutcome::Taken(_)) {
        profile.reschedule(&tracker, now).await;
    }

    bot.send_message(
        chat_id,
        render::take_outcome(outcome, tracker.reminders().get(index)),
    )
    .await?;

    Ok(())
}

async fn ask_removal(
    bot: &Bot,
    dialogue: &GlobalDialogue,
    profile: &Profile,
    index: usize,
) -> HandlerResult {
    let question = {
        let tracker = profile.tracker.lock().await;
        tracker.reminders().get(index).map(render::removal_question)
    };

    let Some(question) = question else {
        bot.send_message(
            dialogue.chat_id(),
            render::take_outcome(TakeOutcome::NoSuchReminder, None),
        )
        .await?;
        return Ok(());
    };

    let keyboard = InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("Remove", ReminderAction::ConfirmRemoval.data()),
        InlineKeyboardButton::callback("Keep", ReminderAction::CancelRemoval.data()),
    ]]);
    bot.send_message(dialogue.chat_id(), question)
        .reply_markup(keyboard)
        .await?;

    dialogue
        .update(GlobalState::ConfirmingRemoval { index })
        .await?;

    Ok(())
}

async fn take_command(
    bot: Bot,
    msg: Message,
    arg: String,
    profiles: Arc<Profiles>,
    profile: Arc<Profile>,
) -> HandlerResult {
    match parse_position(&arg) {
        Ok(index) => take(&bot, msg.chat.id, &profiles, &profile, index).await,
        Err(error) => {
            bot.send_message(msg.chat.id, error.to_string()).await?;
            Ok(())
        }
    }
}

async fn remove_command(
    bot: Bot,
    dialogue: GlobalDialogue,
    msg: Message,
    arg: String,
    profile: Arc<Profile>,
) -> HandlerResult {
    match parse_position(&arg) {
        Ok(index) => ask_removal(&bot, &dialogue, &profile, index).await,
        Err(error) => {
            bot.send_message(msg.chat.id, error.to_string()).await?;
            Ok(())
        }
    }
}

async fn handle_action(
    bot: Bot,
    dialogue: GlobalDialogue,
    query: CallbackQuery,
    action: ReminderAction,
    profiles: Arc<Profiles>,
    profile: Arc<Profile>,
) -> HandlerResult {
    bot.answer_callback_query(query.id).await?;

    match action {
        ReminderAction::Take(index) => {
            take(&bot, dialogue.chat_id(), &profiles, &profile, index).await
        }
        ReminderAction::Remove(index) => ask_removal(&bot, &dialogue, &profile, index).await,
        ReminderAction::ConfirmRemoval | ReminderAction::CancelRemoval => {
            bot.send_message(dialogue.chat_id(), "There is nothing to confirm.")
                .await?;
            Ok(())
        }
    }
}

async fn confirm_removal(
    bot: Bot,
    dialogue: GlobalDialogue,
    index: usize,
    query: CallbackQuery,
    action: ReminderAction,
    profiles: Arc<Profiles>,
    profile: Arc<Profile>,
) -> HandlerResult {
    settle_query(&bot, &query).await?;

    let text = if action == ReminderAction::ConfirmRemoval {
        let now = profiles.now();
        let mut tracker = profile.tracker.lock().await;
        match tracker.remove_reminder(index).await? {
            Some(removed) => {
                profile.reschedule(&tracker, now).await;
                format!("Removed the reminder for {}.", removed.name)
            }
            None => render::take_outcome(TakeOutcome::NoSuchReminder, None),
        }
    } else {
        "The reminder was kept.".to_string()
    };

    bot.send_message(dialogue.chat_id(), text).await?;
    dialogue.exit().await?;
    Ok(())
}

pub(super) fn schema() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(
            Update::filter_message().branch(
                filter_command::<Command, _>()
                    .branch(case![Command::Reminders].endpoint(list_reminders))
                    .branch(case![Command::AddReminder].endpoint(add_reminder_start))
                    .branch(case![Command::Take(arg)].endpoint(take_command))
                    .branch(case![Command::Remove(arg)].endpoint(remove_command)),
            ),
        )
        .branch(
            Update::filter_callback_query()
                .filter_map(|query: CallbackQuery| {
                    query.data.as_deref().and_then(ReminderAction::parse)
                })
                .branch(
                    case![GlobalState::ConfirmingRemoval { index }]
                        .filter(|action: ReminderAction| action.answers_removal_prompt())
                        .endpoint(confirm_removal),
                )
                .branch(dptree::endpoint(handle_action)),
        )
}

/// Text replies while a reminder is being added.
pub(super) fn dialogue_schema() -> UpdateHandler<anyhow::Error> {
    Update::filter_message().branch(
        case![GlobalState::AddingReminder(x)]
            .branch(case![AddingReminderState::WaitingForName].endpoint(receive_name))
            .branch(case![AddingReminderState::WaitingForDose { name }].endpoint(receive_dose))
            .branch(
                case![AddingReminderState::WaitingForSchedule { name, dose }]
                    .endpoint(receive_schedule),
            ),
    )
}
