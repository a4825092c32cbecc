use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::reminder::{Reminder, ScheduleTime};

pub const MEDICINE_REMINDER_TAG: &str = "medicine-reminder";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    /// The user has not been asked yet.
    #[default]
    Default,
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub tag: String,
    pub name: String,
    pub dose: String,
    pub time: ScheduleTime,
}

impl Notification {
    pub fn for_slot(reminder: &Reminder, slot: ScheduleTime) -> Self {
        Self {
            tag: MEDICINE_REMINDER_TAG.to_string(),
            name: reminder.name.clone(),
            dose: reminder.dose.clone(),
            time: slot,
        }
    }
}

#[async_trait]
pub trait NotificationChannel: Send + Sync + 'static {
    async fn permission(&self) -> NotificationPermission;

    /// Asks the user for permission and returns the resulting state.
    async fn request_permission(&self) -> NotificationPermission;

    async fn show(&self, notification: &Notification) -> anyhow::Result<()>;

    /// Tells the user a reminder was due but notifications are blocked.
    async fn explain_denied(&self, notification: &Notification) -> anyhow::Result<()>;

    /// Removes previously shown notifications carrying `tag`.
    async fn clear(&self, tag: &str) -> anyhow::Result<()>;
}

pub async fn deliver(
    channel: &dyn NotificationChannel,
    notification: &Notification,
) -> anyhow::Result<()> {
    let permission = match channel.permission().await {
        NotificationPermission::Default => channel.request_permission().await,
        permission => permission,
    };

    match permission {
        NotificationPermission::Granted => channel.show(notification).await,
        NotificationPermission::Denied => channel.explain_denied(notification).await,
        NotificationPermission::Default => {
            log::info!(
                "Permission still undetermined, dropping notification. [name = {}, time = {}]",
                notification.name,
                notification.time
            );
            Ok(())
        }
    }
}
