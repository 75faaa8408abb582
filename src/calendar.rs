//! Week arithmetic and date labels for the meal planner.
//!
//! Weeks start on Sunday.

use time::{
    Date, Duration, OffsetDateTime, format_description::FormatItem, macros::format_description,
};

const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const SHORT_DATE: &[FormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none]");
const LONG_DATE: &[FormatItem<'static>] =
    format_description!("[weekday], [month repr:long] [day padding:none], [year]");

pub const DAYS_PER_WEEK: i64 = 7;

/// Today in the local timezone, or UTC when the offset is unknown.
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// The Sunday on or before `date`.
pub fn week_start(date: Date) -> Date {
    date - Duration::days(i64::from(date.weekday().number_days_from_sunday()))
}

/// `YYYY-MM-DD`, the backend's date format.
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

pub fn parse_date(raw: &str) -> Result<Date, time::error::Parse> {
    Date::parse(raw.trim(), ISO_DATE)
}

/// `Jan 14`
pub fn short_label(date: Date) -> String {
    date.format(SHORT_DATE).unwrap_or_else(|_| format_date(date))
}

/// `Wednesday, January 17, 2024`
pub fn long_label(date: Date) -> String {
    date.format(LONG_DATE).unwrap_or_else(|_| format_date(date))
}

/// `1h 5m` / `45m`; empty for zero minutes.
pub fn format_minutes(minutes: u32) -> String {
    if minutes == 0 {
        return String::new();
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

/// A Sunday-to-Saturday window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Week {
    pub start: Date,
}

impl Week {
    pub fn containing(date: Date) -> Self {
        Self {
            start: week_start(date),
        }
    }

    pub fn end(&self) -> Date {
        self.start + Duration::days(DAYS_PER_WEEK - 1)
    }

    pub fn contains(&self, date: Date) -> bool {
        date >= self.start && date <= self.end()
    }

    pub fn days(&self) -> Vec<Date> {
        (0..DAYS_PER_WEEK)
            .map(|offset| self.start + Duration::days(offset))
            .collect()
    }

    pub fn shifted(&self, weeks: i64) -> Self {
        Self {
            start: self.start + Duration::days(DAYS_PER_WEEK * weeks),
        }
    }

    /// `Jan 14 - Jan 20`
    pub fn label(&self) -> String {
        format!("{} - {}", short_label(self.start), short_label(self.end()))
    }

    /// `start_date`/`end_date` query pair for `/api/meal-plans`.
    pub fn query(&self) -> [(&'static str, String); 2] {
        [
            ("start_date", format_date(self.start)),
            ("end_date", format_date(self.end())),
        ]
    }
}

/// Serde adapter for `YYYY-MM-DD` dates.
pub mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(serde::de::Error::custom)
    }
}
