mod contacts;
mod favorites;
mod mood;
mod profile;
mod reminders;
mod water;

use std::sync::Arc;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::{
    calculators::{BmiResult, CalorieResult},
    clock::is_today,
    reminder::{NewReminder, Reminder},
    scheduling::NotificationPermission,
    storage::{KeyValueStore, keys, read_or_default, write_value},
};

pub use contacts::{ContactBook, EmergencyContact};
pub use favorites::Favorites;
pub use mood::{Mood, MoodEntry, MoodJournal};
pub use profile::UserProfile;
pub use reminders::{ReminderBook, TakeOutcome};
pub use water::{GLASS_ML, WaterIntake, WaterProgress, WaterTarget, parse_amount};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolInputError {
    #[error("Please pick a mood: great, good, okay, bad or awful.")]
    MissingMood,

    #[error("Unknown mood \"{0}\". Use great, good, okay, bad or awful.")]
    UnknownMood(String),

    #[error("Please fill in both the contact name and phone number.")]
    MissingContactField,

    #[error("Invalid water amount \"{0}\". Please enter a positive number of ml.")]
    InvalidWaterAmount(String),

    #[error("Invalid water target \"{0}\". Please enter a positive number of ml.")]
    InvalidWaterTarget(String),

    #[error("Could not read profile \"{0}\". Use: <name> <YYYY-MM-DD> <male|female>, with - to skip a field.")]
    InvalidProfile(String),

    #[error("Invalid number \"{0}\". Please use the number shown in the list.")]
    InvalidPosition(String),
}

/// Parses a 1-based list position into an index.
pub fn parse_position(raw: &str) -> Result<usize, ToolInputError> {
    match raw.trim().parse::<usize>() {
        Ok(position) if position > 0 => Ok(position - 1),
        _ => Err(ToolInputError::InvalidPosition(raw.trim().to_string())),
    }
}

/// In-memory state of one profile. Every mutation is written through to the
/// store under its own key.
pub struct Tracker {
    store: Arc<dyn KeyValueStore>,
    reminders: ReminderBook,
    water: WaterIntake,
    water_target: WaterTarget,
    moods: MoodJournal,
    contacts: ContactBook,
    favorites: Favorites,
    profile: UserProfile,
    last_bmi: Option<BmiResult>,
    last_calories: Option<CalorieResult>,
}

impl Tracker {
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let s = store.as_ref();

        Self {
            reminders: read_or_default(s, keys::MEDICINE_REMINDERS).await,
            water: read_or_default(s, keys::WATER_INTAKE).await,
            water_target: read_or_default(s, keys::WATER_TARGET).await,
            moods: read_or_default(s, keys::MOOD_HISTORY).await,
            contacts: read_or_default(s, keys::EMERGENCY_CONTACTS).await,
            favorites: read_or_default(s, keys::FAVORITE_ARTICLES).await,
            profile: read_or_default(s, keys::USER_INFO).await,
            last_bmi: read_or_default(s, keys::LAST_BMI_RESULT).await,
            last_calories: read_or_default(s, keys::LAST_CALORIE_RESULT).await,
            store,
        }
    }

    /// Drops taken entries from earlier days unless a reset already ran today.
    /// Returns whether the sweep ran.
    pub async fn reset_taken_if_new_day(&mut self, now: NaiveDateTime) -> anyhow::Result<bool> {
        let last_reset: Option<NaiveDateTime> =
            read_or_default(self.store.as_ref(), keys::LAST_TAKEN_RESET).await;
        if is_today(last_reset.as_ref(), now) {
            return Ok(false);
        }

        if self.reminders.retain_today(now) {
            self.persist_reminders().await?;
        }
        write_value(self.store.as_ref(), keys::LAST_TAKEN_RESET, &now).await?;

        log::info!("Reset taken reminders for a new day. [last_reset = {last_reset:?}]");
        Ok(true)
    }

    pub fn reminders(&self) -> &[Reminder] {
        self.reminders.as_slice()
    }

    pub async fn add_reminder(&mut self, reminder: NewReminder) -> anyhow::Result<()> {
        self.reminders.push(reminder.into_reminder());
        self.persist_reminders().await
    }

    pub async fn take_reminder(
        &mut self,
        index: usize,
        now: NaiveDateTime,
    ) -> anyhow::Result<TakeOutcome> {
        let outcome = self.reminders.take(index, now);
        if matches!(outcome, TakeOutcome::Taken(_)) {
            self.persist_reminders().await?;
        }
        Ok(outcome)
    }

    pub async fn remove_reminder(&mut self, index: usize) -> anyhow::Result<Option<Reminder>> {
        let removed = self.reminders.remove(index);
        if removed.is_some() {
            self.persist_reminders().await?;
        }
        Ok(removed)
    }

    pub fn water_progress(&self, now: NaiveDateTime) -> WaterProgress {
        WaterProgress::new(self.water.consumed_on(now), self.water_target)
    }

    pub async fn add_water(
        &mut self,
        amount_ml: u32,
        now: NaiveDateTime,
    ) -> anyhow::Result<WaterProgress> {
        self.water.add(amount_ml, now);
        write_value(self.store.as_ref(), keys::WATER_INTAKE, &self.water).await?;
        Ok(self.water_progress(now))
    }

    pub async fn set_water_target(&mut self, target: WaterTarget) -> anyhow::Result<()> {
        self.water_target = target;
        write_value(self.store.as_ref(), keys::WATER_TARGET, &self.water_target).await
    }

    pub fn moods(&self) -> &[MoodEntry] {
        self.moods.entries()
    }

    pub async fn record_mood(&mut self, entry: MoodEntry) -> anyhow::Result<()> {
        self.moods.record(entry);
        write_value(self.store.as_ref(), keys::MOOD_HISTORY, &self.moods).await
    }

    pub fn contacts(&self) -> &[EmergencyContact] {
        self.contacts.entries()
    }

    pub async fn add_contact(&mut self, contact: EmergencyContact) -> anyhow::Result<()> {
        self.contacts.push(contact);
        write_value(self.store.as_ref(), keys::EMERGENCY_CONTACTS, &self.contacts).await
    }

    pub async fn remove_contact(&mut self, index: usize) -> anyhow::Result<Option<EmergencyContact>> {
        let removed = self.contacts.remove(index);
        if removed.is_some() {
            write_value(self.store.as_ref(), keys::EMERGENCY_CONTACTS, &self.contacts).await?;
        }
        Ok(removed)
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub async fn save_profile(&mut self, profile: UserProfile) -> anyhow::Result<()> {
        self.profile = profile;
        write_value(self.store.as_ref(), keys::USER_INFO, &self.profile).await
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub async fn toggle_favorite(&mut self, article_id: &str) -> anyhow::Result<bool> {
        let is_favorite = self.favorites.toggle(article_id);
        write_value(self.store.as_ref(), keys::FAVORITE_ARTICLES, &self.favorites).await?;
        Ok(is_favorite)
    }

    pub fn last_bmi(&self) -> Option<&BmiResult> {
        self.last_bmi.as_ref()
    }

    pub async fn save_bmi(&mut self, result: BmiResult) -> anyhow::Result<()> {
        self.last_bmi = Some(result);
        write_value(self.store.as_ref(), keys::LAST_BMI_RESULT, &self.last_bmi).await
    }

    pub fn last_calories(&self) -> Option<&CalorieResult> {
        self.last_calories.as_ref()
    }

    pub async fn save_calories(&mut self, result: CalorieResult) -> anyhow::Result<()> {
        self.last_calories = Some(result);
        write_value(self.store.as_ref(), keys::LAST_CALORIE_RESULT, &self.last_calories).await
    }

    /// Read from the store on every call since the notification channel updates it too.
    pub async fn notification_permission(&self) -> NotificationPermission {
        read_or_default(self.store.as_ref(), keys::NOTIFICATION_PERMISSION).await
    }

    pub async fn set_notification_permission(
        &self,
        permission: NotificationPermission,
    ) -> anyhow::Result<()> {
        write_value(self.store.as_ref(), keys::NOTIFICATION_PERMISSION, &permission).await
    }

    async fn persist_reminders(&self) -> anyhow::Result<()> {
        write_value(self.store.as_ref(), keys::MEDICINE_REMINDERS, &self.reminders).await
    }
}

#[cfg(test)]
mod tests;
