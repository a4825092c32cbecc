use chrono::{NaiveDate, NaiveDateTime, Utc};

/// Wall-clock source. Everything downstream works with naive local time.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveDateTime;
}

pub struct ZonedClock(chrono_tz::Tz);

impl ZonedClock {
    pub fn new(timezone: chrono_tz::Tz) -> Self {
        Self(timezone)
    }
}

impl Clock for ZonedClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.0).naive_local()
    }
}

pub trait CalendarDay {
    fn calendar_day(&self) -> NaiveDate;
}

impl CalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

/// True iff `timestamp` falls on the same local calendar day as `now`.
/// A missing timestamp is never today.
pub fn is_today<T: CalendarDay>(timestamp: Option<&T>, now: NaiveDateTime) -> bool {
    timestamp.is_some_and(|timestamp| timestamp.calendar_day() == now.date())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeDelta};

    use super::*;
    use crate::test_utils::at;

    #[test]
    fn missing_timestamp_is_never_today() {
        assert!(!is_today::<NaiveDateTime>(None, at(12, 0)));
    }

    #[test]
    fn same_date_is_today_regardless_of_time() {
        let now = at(0, 1);
        let late = at(23, 59);

        assert!(is_today(Some(&late), now));
        assert!(is_today(Some(&now.date()), now));
    }

    #[test]
    fn one_minute_past_midnight_is_another_day() {
        let now = at(0, 0);
        let yesterday = now - TimeDelta::minutes(1);

        assert!(!is_today(Some(&yesterday), now));
    }

    #[test]
    fn same_day_of_another_month_is_not_today() {
        let now = at(9, 0);
        let other = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap();

        assert!(!is_today(Some(&other), now));
    }

    #[test]
    fn zoned_clock_follows_configured_timezone() {
        let utc = ZonedClock::new(chrono_tz::UTC).now();
        let jakarta = ZonedClock::new(chrono_tz::Asia::Jakarta).now();
        let offset = jakarta - utc;

        assert!(
            (offset - TimeDelta::hours(7)).num_seconds().abs() < 5,
            "Jakarta is UTC+7. offset = {offset:?}"
        );
    }
}
