use crate::core::date::{CalendarDay, date_from_unix_days};

/// Source of "today" for current-day marking.
///
/// [`SystemClock`] counts days in UTC, so near midnight it can disagree with
/// the host's local calendar. Hosts that mark the local day implement this
/// trait over their own time zone source and pass it to
/// `DatePicker::with_clock`.
pub trait Clock {
    fn today(&self) -> CalendarDay;
}

/// Wall clock. Days roll over at UTC midnight, not local midnight.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> CalendarDay {
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        date_from_unix_days(secs / 86400)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub CalendarDay);

impl Clock for FixedClock {
    fn today(&self) -> CalendarDay {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_yields_a_valid_day() {
        let today = SystemClock.today();
        assert_eq!(today.validate(), Ok(today));
        assert!(today.year >= 2024);
    }

    #[test]
    fn fixed_clock_returns_its_day() {
        let day = CalendarDay::new(2024, 2, 29).expect("date");
        assert_eq!(FixedClock(day).today(), day);
    }
}
