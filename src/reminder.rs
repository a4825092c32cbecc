use std::{collections::HashSet, fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

use crate::clock::is_today;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReminderInputError {
    #[error("Please fill in the medicine name, dose and schedule.")]
    MissingField,

    #[error("Invalid schedule time \"{0}\". Please use the HH:MM format, e.g. 08:00, 20:00")]
    InvalidTime(String),
}

/// Time of day a reminder should be acted on, with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScheduleTime(NaiveTime);

impl ScheduleTime {
    pub fn new(inner: NaiveTime) -> Self {
        let normalized = NaiveTime::from_hms_opt(inner.hour(), inner.minute(), 0).unwrap_or(inner);
        Self(normalized)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.0)
    }
}

impl FromStr for ScheduleTime {
    type Err = ReminderInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 2 || b.is_ascii_digit());

        if !well_formed {
            return Err(ReminderInputError::InvalidTime(s.to_string()));
        }

        NaiveTime::parse_from_str(s, "%H:%M")
            .map(Self::new)
            .map_err(|_| ReminderInputError::InvalidTime(s.to_string()))
    }
}

impl fmt::Display for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for ScheduleTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ScheduleTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Record that a schedule slot was completed on a given calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TakenEntry {
    pub date: NaiveDate,
    pub time: ScheduleTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Completed,
    Missed,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub name: String,
    pub dose: String,
    pub schedule: Vec<ScheduleTime>,
    #[serde(default)]
    pub taken_dates: Vec<TakenEntry>,
}

impl Reminder {
    pub fn is_taken(&self, slot: ScheduleTime, now: NaiveDateTime) -> bool {
        self.taken_dates
            .iter()
            .any(|entry| entry.time == slot && is_today(Some(&entry.date), now))
    }

    /// A slot due exactly at `now` is still upcoming.
    pub fn slot_status(&self, slot: ScheduleTime, now: NaiveDateTime) -> SlotStatus {
        if self.is_taken(slot, now) {
            SlotStatus::Completed
        } else if slot.on(now.date()) < now {
            SlotStatus::Missed
        } else {
            SlotStatus::Upcoming
        }
    }

    pub fn slot_statuses(&self, now: NaiveDateTime) -> Vec<(ScheduleTime, SlotStatus)> {
        self.schedule
            .iter()
            .map(|slot| (*slot, self.slot_status(*slot, now)))
            .collect()
    }

    pub fn all_taken(&self, now: NaiveDateTime) -> bool {
        self.schedule.iter().all(|slot| self.is_taken(*slot, now))
    }

    /// Untaken slots still ahead of `now` today.
    pub fn pending_slots(&self, now: NaiveDateTime) -> impl Iterator<Item = ScheduleTime> + '_ {
        self.schedule
            .iter()
            .copied()
            .filter(move |slot| slot.on(now.date()) > now && !self.is_taken(*slot, now))
    }

    /// The untaken slot closest to `now` in either direction. Ties go to the
    /// slot listed first in the schedule.
    pub fn nearest_outstanding_slot(&self, now: NaiveDateTime) -> Option<ScheduleTime> {
        self.schedule
            .iter()
            .copied()
            .filter(|slot| !self.is_taken(*slot, now))
            .min_by_key(|slot| (slot.on(now.date()) - now).num_seconds().abs())
    }

    pub fn mark_taken(&mut self, now: NaiveDateTime) -> Option<ScheduleTime> {
        let slot = self.nearest_outstanding_slot(now)?;
        self.taken_dates.push(TakenEntry {
            date: now.date(),
            time: slot,
        });

        Some(slot)
    }

    /// Drops taken entries from previous days. Returns whether anything was dropped.
    pub fn retain_today(&mut self, now: NaiveDateTime) -> bool {
        let before = self.taken_dates.len();
        self.taken_dates
            .retain(|entry| is_today(Some(&entry.date), now));

        before != self.taken_dates.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReminder {
    pub name: String,
    pub dose: String,
    pub schedule: Vec<ScheduleTime>,
}

impl NewReminder {
    /// `schedule` is a comma or space separated list of `HH:MM` times.
    /// Repeated times are kept once, in order of first appearance.
    pub fn parse(name: &str, dose: &str, schedule: &str) -> Result<Self, ReminderInputError> {
        let (name, dose) = (name.trim(), dose.trim());
        let mut schedule = schedule
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<ScheduleTime>, _>>()?;

        let mut seen = HashSet::new();
        schedule.retain(|time| seen.insert(*time));

        if name.is_empty() || dose.is_empty() || schedule.is_empty() {
            return Err(ReminderInputError::MissingField);
        }

        Ok(Self {
            name: name.to_string(),
            dose: dose.to_string(),
            schedule,
        })
    }

    pub fn into_reminder(self) -> Reminder {
        Reminder {
            name: self.name,
            dose: self.dose,
            schedule: self.schedule,
            taken_dates: Vec::new(),
        }
    }
}
