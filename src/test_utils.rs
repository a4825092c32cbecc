use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::{
    clock::Clock,
    reminder::{Reminder, ScheduleTime, TakenEntry},
    scheduling::{Notification, NotificationChannel, NotificationPermission},
};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 31).unwrap()
}

pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    today().and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
}

pub fn yesterday_at(hour: u32, minute: u32) -> NaiveDateTime {
    at(hour, minute) - TimeDelta::days(1)
}

pub fn slot(text: &str) -> ScheduleTime {
    text.parse().unwrap()
}

pub fn reminder(name: &str, schedule: &[&str]) -> Reminder {
    Reminder {
        name: name.to_string(),
        dose: "1 tablet".to_string(),
        schedule: schedule.iter().map(|s| slot(s)).collect(),
        taken_dates: Vec::new(),
    }
}

pub fn taken(date: NaiveDate, time: &str) -> TakenEntry {
    TakenEntry {
        date,
        time: slot(time),
    }
}

pub struct FixedClock(NaiveDateTime);

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Cleared(String),
    PermissionRequested,
    Shown(Notification),
    Explained(Notification),
}

pub type ReceivedEvents = Arc<Mutex<Vec<ChannelEvent>>>;

pub struct RecordingChannel {
    pub events: ReceivedEvents,
    permission: Mutex<NotificationPermission>,
    request_answer: NotificationPermission,
}

impl RecordingChannel {
    pub fn new(permission: NotificationPermission) -> Self {
        Self::answering(permission, permission)
    }

    /// A channel whose permission prompt resolves to `request_answer`.
    pub fn answering(
        permission: NotificationPermission,
        request_answer: NotificationPermission,
    ) -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            permission: Mutex::new(permission),
            request_answer,
        }
    }

    pub fn events(&self) -> Vec<ChannelEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn shown(&self) -> Vec<Notification> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ChannelEvent::Shown(notification) => Some(notification),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    async fn permission(&self) -> NotificationPermission {
        *self.permission.lock().unwrap()
    }

    async fn request_permission(&self) -> NotificationPermission {
        self.events
            .lock()
            .unwrap()
            .push(ChannelEvent::PermissionRequested);
        *self.permission.lock().unwrap() = self.request_answer;
        self.request_answer
    }

    async fn show(&self, notification: &Notification) -> anyhow::Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(ChannelEvent::Shown(notification.clone()));
        Ok(())
    }

    async fn explain_denied(&self, notification: &Notification) -> anyhow::Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(ChannelEvent::Explained(notification.clone()));
        Ok(())
    }

    async fn clear(&self, tag: &str) -> anyhow::Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(ChannelEvent::Cleared(tag.to_string()));
        Ok(())
    }
}
