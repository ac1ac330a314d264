use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};

use crate::models::{ResearchGroup, StreakInfo, WeeklyProgress};
use crate::week::{iso_week_of, IsoWeekKey};

pub const CONSISTENCY_WINDOW_DAYS: i64 = 30;
pub const WEEKLY_TARGET_WEEKS: usize = 26;

pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(chrono::NaiveTime::MIN).and_utc()
}

pub fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    let first = now.date_naive().with_day(1).unwrap_or(now.date_naive());
    first.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Calendar months back, clamped to the end of shorter months.
pub fn six_months_ago(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(6))
        .unwrap_or(now - Duration::days(183))
}

pub fn thirty_days_ago(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(CONSISTENCY_WINDOW_DAYS)
}

pub fn compute_streak(check_ins: &[DateTime<Utc>], now: DateTime<Utc>) -> StreakInfo {
    let days: HashSet<NaiveDate> = check_ins.iter().map(|ts| ts.date_naive()).collect();
    let daily_done = check_ins
        .iter()
        .max()
        .is_some_and(|latest| *latest >= start_of_day(now));

    let mut cursor = now.date_naive();
    if !daily_done {
        cursor = cursor - Duration::days(1);
    }

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor = cursor - Duration::days(1);
    }

    StreakInfo { streak, daily_done }
}

/// Rounded percentage of `target`, capped at 100.
pub fn capped_percent(count: f64, target: f64) -> u32 {
    if target <= 0.0 || count <= 0.0 {
        return 0;
    }
    ((count / target * 100.0).round() as u32).min(100)
}

pub fn consistency(recent_check_ins: i64) -> u32 {
    capped_percent(recent_check_ins as f64, CONSISTENCY_WINDOW_DAYS as f64)
}

pub fn weekly_progress(recordings: &[DateTime<Utc>], now: DateTime<Utc>) -> WeeklyProgress {
    let weeks: HashSet<IsoWeekKey> = recordings
        .iter()
        .map(|ts| iso_week_of(ts.date_naive()))
        .collect();
    let current = iso_week_of(now.date_naive());

    WeeklyProgress {
        percent: capped_percent(weeks.len() as f64, WEEKLY_TARGET_WEEKS as f64),
        distinct_weeks: weeks.len(),
        weekly_done: weeks.contains(&current),
    }
}

pub fn research_group(research_id: Option<&str>) -> ResearchGroup {
    match research_id {
        Some(id) if id.ends_with(".ex") => ResearchGroup::Ex,
        Some(id) if id.ends_with(".cg") => ResearchGroup::Cg,
        _ => ResearchGroup::Unclassified,
    }
}
