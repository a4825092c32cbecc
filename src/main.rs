mod appsettings;
mod articles;
mod calculators;
mod clock;
mod profiles;
mod reminder;
mod scheduling;
mod storage;
mod telegram;
mod tracker;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use anyhow::Context;
use teloxide::Bot;

use crate::{
    clock::ZonedClock,
    profiles::Profiles,
    telegram::{PermissionPrompts, TelegramInteractionInterface, TelegramProfileFactory},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = appsettings::get()?;
    let timezone: chrono_tz::Tz = settings
        .clock
        .timezone
        .parse()
        .map_err(|error| anyhow::anyhow!("Invalid clock.timezone: {error}"))?;

    let bot = Bot::new(&settings.telegram.token);
    let prompts = Arc::new(PermissionPrompts::default());
    let factory = TelegramProfileFactory::new(
        bot.clone(),
        settings.storage.persistent_dir(),
        Arc::clone(&prompts),
        settings.notifications.permission_prompt_timeout(),
    );
    let profiles = Arc::new(Profiles::new(
        Arc::new(factory),
        Arc::new(ZonedClock::new(timezone)),
    ));

    let restored = profiles
        .restore_all()
        .await
        .context("Failed to restore profiles")?;
    log::info!(
        "Restored profiles. [count = {restored}, data_dir = {}, ephemeral = {}, timezone = {timezone}]",
        settings.storage.data_dir.display(),
        settings.storage.ephemeral
    );

    TelegramInteractionInterface::start(bot, profiles, prompts).await;
    Ok(())
}
