//! Attendance log view.

use std::cmp::Reverse;

use super::parse_date;
use crate::models::AttendanceRecord;

/// Records on `date` (all records when `None`), newest first.
pub fn attendance_log<'a>(
    attendance: &'a [AttendanceRecord],
    date: Option<&str>,
) -> Vec<&'a AttendanceRecord> {
    let mut log: Vec<&AttendanceRecord> = attendance
        .iter()
        .filter(|record| date.map_or(true, |d| record.date == d))
        .collect();
    log.sort_by_key(|record| Reverse(parse_date(&record.date)));
    log
}
