use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::reminder::{Reminder, ScheduleTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakeOutcome {
    Taken(ScheduleTime),
    AlreadyComplete,
    NoSuchReminder,
}

/// Ordered list of medicine reminders, persisted as a plain JSON array.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderBook(Vec<Reminder>);

impl ReminderBook {
    pub fn as_slice(&self) -> &[Reminder] {
        &self.0
    }

    pub fn push(&mut self, reminder: Reminder) {
        self.0.push(reminder);
    }

    pub fn take(&mut self, index: usize, now: NaiveDateTime) -> TakeOutcome {
        let Some(reminder) = self.0.get_mut(index) else {
            return TakeOutcome::NoSuchReminder;
        };

        match reminder.mark_taken(now) {
            Some(slot) => TakeOutcome::Taken(slot),
            None => TakeOutcome::AlreadyComplete,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<Reminder> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    /// Drops every taken entry not dated today. Returns whether any reminder changed.
    pub fn retain_today(&mut self, now: NaiveDateTime) -> bool {
        self.0
            .iter_mut()
            .fold(false, |changed, reminder| reminder.retain_today(now) || changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{at, reminder, slot, taken, today, yesterday_at};

    fn book(names: &[&str]) -> ReminderBook {
        ReminderBook(names.iter().map(|name| reminder(name, &["08:00", "20:00"])).collect())
    }

    #[test]
    fn removing_index_removes_exactly_that_entry() {
        let mut book = book(&["A", "B", "C"]);

        let removed = book.remove(1);

        assert_eq!(removed.map(|r| r.name), Some("B".to_string()));
        let names: Vec<_> = book.as_slice().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn removing_out_of_range_is_a_no_op() {
        let mut book = book(&["A"]);

        assert_eq!(book.remove(1), None);
        assert_eq!(book.as_slice().len(), 1);
    }

    #[test]
    fn take_marks_nearest_slot_until_complete() {
        let mut book = book(&["A"]);

        assert_eq!(book.take(0, at(19, 0)), TakeOutcome::Taken(slot("20:00")));
        assert_eq!(book.take(0, at(19, 0)), TakeOutcome::Taken(slot("08:00")));
        assert_eq!(book.take(0, at(19, 0)), TakeOutcome::AlreadyComplete);
        assert_eq!(book.take(3, at(19, 0)), TakeOutcome::NoSuchReminder);
    }

    #[test]
    fn retain_today_reports_changes() {
        let mut book = book(&["A", "B"]);
        book.0[1]
            .taken_dates
            .push(taken(yesterday_at(8, 0).date(), "08:00"));
        book.0[1].taken_dates.push(taken(today(), "20:00"));

        assert!(book.retain_today(at(9, 0)));
        assert_eq!(book.0[1].taken_dates, vec![taken(today(), "20:00")]);
        assert!(!book.retain_today(at(9, 0)));
    }
}
