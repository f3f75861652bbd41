use chrono::{DateTime, Local};

use super::constants::SUMMARY_DATE_FORMAT;

/// Source of "now" for freshness decisions. Device local time, no timezone
/// normalisation against the backend.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    fn today(&self) -> String {
        self.now().format(SUMMARY_DATE_FORMAT).to_string()
    }

    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[cfg(test)]
pub use manual::ManualClock;

#[cfg(test)]
mod manual {
    use std::sync::Mutex;

    use chrono::{DateTime, Duration, Local, NaiveDate};

    use super::Clock;

    /// Clock that only moves when told to.
    #[derive(Debug)]
    pub struct ManualClock {
        now: Mutex<DateTime<Local>>,
    }

    impl ManualClock {
        /// Midday on the given date, far from any DST transition.
        pub fn at(year: i32, month: u32, day: u32) -> Self {
            let now = NaiveDate::from_ymd_opt(year, month, day)
                .and_then(|date| date.and_hms_opt(12, 0, 0))
                .and_then(|naive| naive.and_local_timezone(Local).earliest())
                .unwrap();
            ManualClock {
                now: Mutex::new(now),
            }
        }

        pub fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Local> {
            *self.now.lock().unwrap()
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn today_uses_iso_calendar_date() {
        let clock = ManualClock::at(2026, 3, 9);
        assert_eq!(clock.today(), "2026-03-09");

        clock.advance(Duration::days(1));
        assert_eq!(clock.today(), "2026-03-10");
    }

    #[test]
    fn millis_follow_advances() {
        let clock = ManualClock::at(2026, 3, 9);
        let before = clock.now_millis();
        clock.advance(Duration::minutes(61));
        assert_eq!(clock.now_millis() - before, 61 * 60 * 1000);
    }
}
