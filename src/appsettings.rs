use std::{path::PathBuf, sync::OnceLock, time::Duration};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct TelegramSettings {
    pub token: String,
}

#[derive(Deserialize, Debug)]
pub struct StorageSettings {
    /// Directory holding one JSON store per chat.
    pub data_dir: PathBuf,
    /// Keep all state in memory and write nothing to `data_dir`.
    pub ephemeral: bool,
}

impl StorageSettings {
    pub fn persistent_dir(&self) -> Option<PathBuf> {
        (!self.ephemeral).then(|| self.data_dir.clone())
    }
}

#[derive(Deserialize, Debug)]
pub struct ClockSettings {
    /// IANA name of the zone whose wall time drives reminders, e.g. `Asia/Jakarta`.
    pub timezone: String,
}

#[derive(Deserialize, Debug)]
pub struct NotificationSettings {
    pub permission_prompt_timeout_secs: u64,
}

impl NotificationSettings {
    pub fn permission_prompt_timeout(&self) -> Duration {
        Duration::from_secs(self.permission_prompt_timeout_secs)
    }
}

#[derive(Deserialize, Debug)]
pub struct AppSettings {
    pub telegram: TelegramSettings,
    pub storage: StorageSettings,
    pub clock: ClockSettings,
    pub notifications: NotificationSettings,
}

impl AppSettings {
    fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("storage.data_dir", "data")?
            .set_default("storage.ephemeral", false)?
            .set_default("clock.timezone", "UTC")?
            .set_default("notifications.permission_prompt_timeout_secs", 300)?
            .add_source(File::with_name("appsettings").required(true))
            .add_source(File::with_name("appsettings.local").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

pub fn get() -> anyhow::Result<&'static AppSettings> {
    static APPSETTINGS: OnceLock<AppSettings> = OnceLock::new();

    if let Some(settings) = APPSETTINGS.get() {
        return Ok(settings);
    }

    let settings = AppSettings::new()?;
    Ok(APPSETTINGS.get_or_init(|| settings))
}
