use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::NaiveDateTime;
use tokio::{
    sync::Mutex,
    task::{self, JoinHandle},
};
use tokio_util::sync::CancellationToken;

use crate::reminder::{Reminder, ScheduleTime};

use super::delivery::{MEDICINE_REMINDER_TAG, Notification, NotificationChannel, deliver};

/// How far delivery of an armed notification can be relied on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryGuarantee {
    /// Timers live in process memory. A restart drops every armed notification.
    InSessionOnly,
}

impl DeliveryGuarantee {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::InSessionOnly => {
                "Reminders are delivered only while the bot keeps running. A restart drops today's pending notifications until you open the bot again."
            }
        }
    }
}

/// Reminder name, dose and the moment its slot falls due.
type TimerKey = (String, String, NaiveDateTime);

pub struct NotificationScheduler {
    channel: Arc<dyn NotificationChannel>,
    timers: Mutex<HashMap<TimerKey, JoinHandle<()>>>,
    shutdown: CancellationToken,
}

impl NotificationScheduler {
    pub fn new(channel: Arc<dyn NotificationChannel>) -> Self {
        Self {
            channel,
            timers: Mutex::new(HashMap::new()),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn guarantee(&self) -> DeliveryGuarantee {
        DeliveryGuarantee::InSessionOnly
    }

    /// Clears shown reminder notifications and arms a one-shot timer for every
    /// untaken slot still ahead of `now` today. Returns the number of timers newly armed.
    ///
    /// A slot whose timer is still running from an earlier call is not armed again.
    /// Running timers are never cancelled, so a slot taken after arming still fires.
    pub async fn schedule_notifications(&self, reminders: &[Reminder], now: NaiveDateTime) -> usize {
        if let Err(error) = self.channel.clear(MEDICINE_REMINDER_TAG).await {
            log::warn!(
                "Could not clear displayed notifications. [tag = {MEDICINE_REMINDER_TAG}, error = {error}]"
            );
        }

        let mut timers = self.timers.lock().await;
        timers.retain(|_, handle| !handle.is_finished());

        let mut armed = 0;
        for reminder in reminders {
            for slot in reminder.pending_slots(now) {
                let Some(delay) = slot_delay(slot, now) else {
                    continue;
                };

                let key = (
                    reminder.name.clone(),
                    reminder.dose.clone(),
                    slot.on(now.date()),
                );
                if timers.contains_key(&key) {
                    continue;
                }

                let handle = self.arm(Notification::for_slot(reminder, slot), delay);
                timers.insert(key, handle);
                armed += 1;
            }
        }

        armed
    }

    pub async fn armed_timers(&self) -> usize {
        let mut timers = self.timers.lock().await;
        timers.retain(|_, handle| !handle.is_finished());
        timers.len()
    }

    fn arm(&self, notification: Notification, delay: Duration) -> JoinHandle<()> {
        log::info!(
            "[SCHEDULE] Sleeping for {:?} delay. [name = {}, time = {}]",
            delay,
            notification.name,
            notification.time
        );

        let cancellation_token = self.shutdown.child_token();
        let channel = Arc::clone(&self.channel);

        task::spawn(async move {
            tokio::select! {
                _ = cancellation_token.cancelled() => {
                    log::info!(
                        "Notification timer was cancelled. [name = {}, time = {}]",
                        notification.name,
                        notification.time
                    );
                },
                _ = tokio::time::sleep(delay) => {
                    log::info!(
                        "[FIRE] Delivering notification. [name = {}, time = {}]",
                        notification.name,
                        notification.time
                    );

                    if let Err(error) = deliver(channel.as_ref(), &notification).await {
                        log::error!(
                            "Failed to deliver notification. [name = {}, error = {error}]",
                            notification.name
                        );
                    }
                }
            }
        })
    }
}

impl Drop for NotificationScheduler {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Time left until `slot` today, or `None` when the slot is not in the future.
pub(crate) fn slot_delay(slot: ScheduleTime, now: NaiveDateTime) -> Option<Duration> {
    (slot.on(now.date()) - now)
        .to_std()
        .ok()
        .filter(|delay| !delay.is_zero())
}
