use crate::core::error::{PickerError, PickerResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single Gregorian day. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDay {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

/// The (year, month) pair a grid is laid out for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weekday(pub u8);

impl Weekday {
    pub const MON: Self = Self(0);
    pub const TUE: Self = Self(1);
    pub const WED: Self = Self(2);
    pub const THU: Self = Self(3);
    pub const FRI: Self = Self(4);
    pub const SAT: Self = Self(5);
    pub const SUN: Self = Self(6);

    pub fn short_name(self) -> &'static str {
        ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"][self.0 as usize % 7]
    }

    /// Days since Monday.
    pub fn index(self) -> usize {
        self.0 as usize % 7
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

pub fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

// Sakamoto's method, shifted so Monday is 0.
pub fn weekday_of(date: CalendarDay) -> Weekday {
    const T: [i32; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let y = if date.month < 3 {
        date.year - 1
    } else {
        date.year
    };
    let m = date.month as i32;
    let d = date.day as i32;
    let raw = (y + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400) + T[(m - 1) as usize] + d)
        .rem_euclid(7);
    Weekday(((raw + 6) % 7) as u8)
}

pub(crate) fn date_from_unix_days(days: i64) -> CalendarDay {
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    CalendarDay {
        year: y as i32,
        month: m as u8,
        day: d as u8,
    }
}

impl MonthKey {
    pub fn new(year: i32, month: u8) -> PickerResult<Self> {
        Self { year, month }.validate()
    }

    /// Checks a key that may have been built from its fields directly.
    pub fn validate(self) -> PickerResult<Self> {
        if !(1..=12).contains(&self.month) {
            return Err(PickerError::InvalidMonth { month: self.month });
        }
        Ok(self)
    }

    pub fn shift(self, delta: i32) -> Self {
        let total = self.month as i32 - 1 + delta;
        Self {
            year: self.year + total.div_euclid(12),
            month: (total.rem_euclid(12) + 1) as u8,
        }
    }

    pub fn prev(self) -> Self {
        self.shift(-1)
    }

    pub fn next(self) -> Self {
        self.shift(1)
    }

    pub fn days(self) -> u8 {
        days_in_month(self.year, self.month)
    }

    pub fn first_day(self) -> CalendarDay {
        CalendarDay {
            year: self.year,
            month: self.month,
            day: 1,
        }
    }

    pub fn last_day(self) -> CalendarDay {
        CalendarDay {
            year: self.year,
            month: self.month,
            day: self.days(),
        }
    }

    pub fn day(self, day: u8) -> CalendarDay {
        CalendarDay {
            year: self.year,
            month: self.month,
            day,
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl CalendarDay {
    pub fn new(year: i32, month: u8, day: u8) -> PickerResult<Self> {
        Self { year, month, day }.validate()
    }

    /// Checks a day that may have been built from its fields directly.
    pub fn validate(self) -> PickerResult<Self> {
        let Self { year, month, day } = self;
        if !(1..=12).contains(&month) {
            return Err(PickerError::InvalidMonth { month });
        }
        if day < 1 || day > days_in_month(year, month) {
            return Err(PickerError::InvalidDate { year, month, day });
        }
        Ok(self)
    }

    pub fn key(self) -> MonthKey {
        MonthKey {
            year: self.year,
            month: self.month,
        }
    }

    pub fn weekday(self) -> Weekday {
        weekday_of(self)
    }

    /// Moves by whole months, clamping the day to the target month's length.
    pub fn add_months(self, delta: i32) -> Self {
        let key = self.key().shift(delta);
        key.day(self.day.min(key.days()))
    }

    /// Moves by whole years, clamping 29 Feb to 28 Feb in common years.
    pub fn add_years(self, delta: i32) -> Self {
        let year = self.year + delta;
        Self {
            year,
            month: self.month,
            day: self.day.min(days_in_month(year, self.month)),
        }
    }

    pub fn next_day(self) -> Self {
        if self.day < days_in_month(self.year, self.month) {
            Self {
                day: self.day + 1,
                ..self
            }
        } else {
            self.key().next().first_day()
        }
    }

    pub fn to_iso(self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso())
    }
}

impl FromStr for CalendarDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segs: Vec<&str> = s.trim().split('-').collect();
        if segs.len() != 3 {
            return Err(format!("expected YYYY-MM-DD, got {s:?}"));
        }
        let (Ok(y), Ok(m), Ok(d)) = (
            segs[0].parse::<i32>(),
            segs[1].parse::<u8>(),
            segs[2].parse::<u8>(),
        ) else {
            return Err(format!("expected YYYY-MM-DD, got {s:?}"));
        };
        Self::new(y, m, d).map_err(|e| e.to_string())
    }
}

impl TryFrom<String> for CalendarDay {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CalendarDay> for String {
    fn from(value: CalendarDay) -> Self {
        value.to_iso()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u8, d: u8) -> CalendarDay {
        CalendarDay::new(y, m, d).expect("valid date")
    }

    #[test]
    fn leap_years_follow_gregorian_rules() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
    }

    #[test]
    fn weekday_is_monday_based() {
        assert_eq!(weekday_of(day(2024, 1, 1)), Weekday::MON);
        assert_eq!(weekday_of(day(2024, 2, 1)), Weekday::THU);
        assert_eq!(weekday_of(day(2024, 3, 1)), Weekday::FRI);
        assert_eq!(weekday_of(day(2023, 10, 1)), Weekday::SUN);
        assert_eq!(Weekday::SUN.short_name(), "Sun");
    }

    #[test]
    fn rejects_impossible_dates() {
        assert_eq!(
            CalendarDay::new(2023, 2, 29),
            Err(PickerError::InvalidDate {
                year: 2023,
                month: 2,
                day: 29
            })
        );
        assert_eq!(
            CalendarDay::new(2023, 13, 1),
            Err(PickerError::InvalidMonth { month: 13 })
        );
        assert!(CalendarDay::new(2023, 4, 0).is_err());
    }

    #[test]
    fn validate_catches_days_built_from_fields() {
        let feb_31 = CalendarDay {
            year: 2024,
            month: 2,
            day: 31,
        };
        assert_eq!(
            feb_31.validate(),
            Err(PickerError::InvalidDate {
                year: 2024,
                month: 2,
                day: 31
            })
        );
        assert_eq!(
            MonthKey {
                year: 2024,
                month: 0
            }
            .validate(),
            Err(PickerError::InvalidMonth { month: 0 })
        );
        assert_eq!(day(2024, 2, 29).validate(), Ok(day(2024, 2, 29)));
    }

    #[test]
    fn month_shift_rolls_over_years() {
        let jan = MonthKey::new(2024, 1).expect("month");
        assert_eq!(jan.prev(), MonthKey { year: 2023, month: 12 });
        let dec = MonthKey::new(2024, 12).expect("month");
        assert_eq!(dec.next(), MonthKey { year: 2025, month: 1 });
        assert_eq!(jan.shift(-25), MonthKey { year: 2021, month: 12 });
    }

    #[test]
    fn add_years_clamps_leap_day() {
        assert_eq!(day(2024, 2, 29).add_years(1), day(2025, 2, 28));
        assert_eq!(day(2024, 2, 29).add_years(4), day(2028, 2, 29));
        assert_eq!(day(2024, 1, 31).add_months(1), day(2024, 2, 29));
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!("2024-02-15".parse::<CalendarDay>(), Ok(day(2024, 2, 15)));
        assert!("2024-02".parse::<CalendarDay>().is_err());
        assert!("2024-02-30".parse::<CalendarDay>().is_err());
        assert_eq!(day(2024, 3, 1).to_string(), "2024-03-01");
    }

    #[test]
    fn unix_days_convert_to_civil_dates() {
        assert_eq!(date_from_unix_days(0), day(1970, 1, 1));
        assert_eq!(date_from_unix_days(19_768), day(2024, 2, 15));
    }
}
