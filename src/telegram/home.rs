use std::sync::Arc;

use teloxide::{
    dispatching::UpdateHandler, dptree::case, filter_command, prelude::*,
    utils::command::BotCommands,
};

use crate::{
    articles,
    profiles::{Profile, Profiles},
};

use super::{Command, HandlerResult, render};

async fn home_text(profiles: &Profiles, profile: &Profile) -> String {
    let now = profiles.now();
    let tracker = profile.tracker.lock().await;

    render::home(
        tracker.profile(),
        tracker.reminders(),
        &tracker.water_progress(now),
        articles::daily_tip(now.date()),
    )
}

async fn start(
    bot: Bot,
    msg: Message,
    profiles: Arc<Profiles>,
    profile: Arc<Profile>,
) -> HandlerResult {
    let home = home_text(&profiles, &profile).await;

    bot.send_message(
        msg.chat.id,
        format!(
            "Welcome to SehatPeduli, your daily health companion.\n{}\n\n{home}\n\nSee /help for everything I can do.",
            profile.scheduler.guarantee().describe()
        ),
    )
    .await?;
    Ok(())
}

async fn home(
    bot: Bot,
    msg: Message,
    profiles: Arc<Profiles>,
    profile: Arc<Profile>,
) -> HandlerResult {
    bot.send_message(msg.chat.id, home_text(&profiles, &profile).await)
        .await?;
    Ok(())
}

async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

pub(super) fn schema() -> UpdateHandler<anyhow::Error> {
    Update::filter_message().branch(
        filter_command::<Command, _>()
            .branch(case![Command::Start].endpoint(start))
            .branch(case![Command::Home].endpoint(home))
            .branch(case![Command::Help].endpoint(help)),
    )
}
