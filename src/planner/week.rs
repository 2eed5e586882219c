use chrono::{Datelike, Duration, NaiveDate};

use crate::planner::constants::{DAYS_IN_PLAN, LAST_PLANNING_WEEKDAY};

/// Monday of the calendar week containing `date`.
///
/// This is the lookup key for persisted plan weeks.
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// The Monday to plan from.
///
/// Monday to Wednesday plan the current week; Thursday onwards plans the
/// following one.
pub fn start_of_planning_week(date: NaiveDate) -> NaiveDate {
    let monday = monday_of_week(date);
    if date.weekday().num_days_from_monday() <= LAST_PLANNING_WEEKDAY {
        monday
    } else {
        monday + Duration::days(DAYS_IN_PLAN)
    }
}

/// The dates of a planning window starting at `start`.
pub fn window_dates(start: NaiveDate) -> Vec<NaiveDate> {
    (0..DAYS_IN_PLAN).map(|offset| start + Duration::days(offset)).collect()
}
