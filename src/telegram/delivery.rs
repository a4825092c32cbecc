use std::{collections::HashMap, ffi::OsStr, path::PathBuf, sync::Arc, time::Duration};

use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId},
};
use tokio::{
    fs,
    sync::{Mutex, oneshot},
};

use crate::{
    profiles::{ProfileFactory, ProfileId},
    scheduling::{Notification, NotificationChannel, NotificationPermission},
    storage::{InMemoryStore, JsonFileStore, KeyValueStore, keys, read_or_default},
};

use super::render;

pub(super) const ALLOW_NOTIFICATIONS: &str = "notify:allow";
pub(super) const DENY_NOTIFICATIONS: &str = "notify:deny";

pub(super) fn permission_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("Allow", ALLOW_NOTIFICATIONS),
        InlineKeyboardButton::callback("Don't allow", DENY_NOTIFICATIONS),
    ]])
}

/// Permission prompts waiting for the user to press a button. Every waiter of a
/// chat receives the same answer.
#[derive(Default)]
pub struct PermissionPrompts {
    pending: Mutex<HashMap<ChatId, Vec<oneshot::Sender<NotificationPermission>>>>,
}

pub struct PromptWaiter {
    pub answer: oneshot::Receiver<NotificationPermission>,
    /// Another waiter already has a prompt on screen for this chat.
    pub already_prompted: bool,
}

impl PermissionPrompts {
    pub async fn register(&self, chat_id: ChatId) -> PromptWaiter {
        let (tx, rx) = oneshot::channel();
        let mut pending = self.pending.lock().await;
        let waiters = pending.entry(chat_id).or_default();
        waiters.retain(|waiter| !waiter.is_closed());
        let already_prompted = !waiters.is_empty();
        waiters.push(tx);

        PromptWaiter {
            answer: rx,
            already_prompted,
        }
    }

    /// Hands the answer to every waiting prompt. Returns false when nobody was waiting.
    pub async fn resolve(&self, chat_id: ChatId, permission: NotificationPermission) -> bool {
        let Some(waiters) = self.pending.lock().await.remove(&chat_id) else {
            return false;
        };

        waiters
            .into_iter()
            .fold(false, |delivered, tx| tx.send(permission).is_ok() || delivered)
    }
}

pub struct TelegramNotificationChannel {
    bot: Bot,
    chat_id: ChatId,
    store: Arc<dyn KeyValueStore>,
    prompts: Arc<PermissionPrompts>,
    prompt_timeout: Duration,
    displayed: Mutex<HashMap<String, Vec<MessageId>>>,
}

impl TelegramNotificationChannel {
    pub fn new(
        bot: Bot,
        chat_id: ChatId,
        store: Arc<dyn KeyValueStore>,
        prompts: Arc<PermissionPrompts>,
        prompt_timeout: Duration,
    ) -> Self {
        Self {
            bot,
            chat_id,
            store,
            prompts,
            prompt_timeout,
            displayed: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl NotificationChannel for TelegramNotificationChannel {
    async fn permission(&self) -> NotificationPermission {
        read_or_default(self.store.as_ref(), keys::NOTIFICATION_PERMISSION).await
    }

    async fn request_permission(&self) -> NotificationPermission {
        let waiter = self.prompts.register(self.chat_id).await;

        if !waiter.already_prompted {
            let prompt = self
                .bot
                .send_message(
                    self.chat_id,
                    "A medicine reminder is due. Allow reminder notifications in this chat?",
                )
                .reply_markup(permission_keyboard())
                .await;
            if let Err(error) = prompt {
                log::error!(
                    "Failed to send permission prompt. [chat_id = {}, error = {error}]",
                    self.chat_id
                );
                return NotificationPermission::Default;
            }
        }

        match tokio::time::timeout(self.prompt_timeout, waiter.answer).await {
            Ok(Ok(permission)) => permission,
            Ok(Err(_)) => NotificationPermission::Default,
            Err(_) => {
                log::info!(
                    "Permission prompt timed out. [chat_id = {}, timeout = {:?}]",
                    self.chat_id,
                    self.prompt_timeout
                );
                NotificationPermission::Default
            }
        }
    }

    async fn show(&self, notification: &Notification) -> anyhow::Result<()> {
        let message = self
            .bot
            .send_message(self.chat_id, render::notification(notification))
            .await?;

        self.displayed
            .lock()
            .await
            .entry(notification.tag.clone())
            .or_default()
            .push(message.id);

        Ok(())
    }

    async fn explain_denied(&self, notification: &Notification) -> anyhow::Result<()> {
        self.bot
            .send_message(self.chat_id, render::notification_denied(notification))
            .await?;

        Ok(())
    }

    async fn clear(&self, tag: &str) -> anyhow::Result<()> {
        let shown = self.displayed.lock().await.remove(tag).unwrap_or_default();

        for message_id in shown {
            if let Err(error) = self.bot.delete_message(self.chat_id, message_id).await {
                log::warn!(
                    "Could not delete shown notification. [chat_id = {}, message_id = {:?}, error = {error}]",
                    self.chat_id,
                    message_id
                );
            }
        }

        Ok(())
    }
}

/// One JSON store file per chat under `data_dir`, named `<chat id>.json`.
/// Without a `data_dir` every chat gets an in-memory store that lives until shutdown.
pub struct TelegramProfileFactory {
    bot: Bot,
    data_dir: Option<PathBuf>,
    prompts: Arc<PermissionPrompts>,
    prompt_timeout: Duration,
}

impl TelegramProfileFactory {
    pub fn new(
        bot: Bot,
        data_dir: Option<PathBuf>,
        prompts: Arc<PermissionPrompts>,
        prompt_timeout: Duration,
    ) -> Self {
        Self {
            bot,
            data_dir,
            prompts,
            prompt_timeout,
        }
    }
}

#[async_trait]
impl ProfileFactory for TelegramProfileFactory {
    async fn open_store(&self, id: ProfileId) -> anyhow::Result<Arc<dyn KeyValueStore>> {
        let store: Arc<dyn KeyValueStore> = match &self.data_dir {
            Some(data_dir) => {
                Arc::new(JsonFileStore::open(data_dir.join(format!("{id}.json"))).await?)
            }
            None => Arc::new(InMemoryStore::new()),
        };
        Ok(store)
    }

    fn channel(&self, id: ProfileId, store: Arc<dyn KeyValueStore>) -> Arc<dyn NotificationChannel> {
        Arc::new(TelegramNotificationChannel::new(
            self.bot.clone(),
            ChatId(id),
            store,
            Arc::clone(&self.prompts),
            self.prompt_timeout,
        ))
    }

    async fn known_profiles(&self) -> anyhow::Result<Vec<ProfileId>> {
        let Some(data_dir) = &self.data_dir else {
            return Ok(Vec::new());
        };

        let mut entries = match fs::read_dir(data_dir).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(OsStr::to_str) != Some("json") {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(OsStr::to_str)
                .and_then(|stem| stem.parse::<ProfileId>().ok())
            {
                ids.push(id);
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }
}
