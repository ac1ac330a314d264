use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use uuid::Uuid;

/// ISO 8601 week identifier. The ISO year can differ from the calendar
/// year for dates in the first or last days of December/January.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IsoWeekKey {
    pub year: i32,
    pub week: u32,
}

impl fmt::Display for IsoWeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{}", self.year, self.week)
    }
}

/// The week is the one containing the date's Thursday.
pub fn iso_week_of(date: NaiveDate) -> IsoWeekKey {
    let iso = date.iso_week();
    IsoWeekKey {
        year: iso.year(),
        week: iso.week(),
    }
}

pub fn weekly_upload_key(user_id: Uuid, recorded_at: DateTime<Utc>, extension: &str) -> String {
    let week = iso_week_of(recorded_at.date_naive());
    format!(
        "voice/{}/{}.{}",
        user_id,
        week,
        extension.trim_start_matches('.')
    )
}
