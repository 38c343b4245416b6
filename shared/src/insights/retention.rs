//! Retention scan: active members missing from recent services.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use super::parse_date;
use crate::models::{AttendanceRecord, AttendanceStatus, Event, Member, MemberStatus};

/// Event name the retention scan watches by default.
pub const SABBATH_SERVICE: &str = "Sabbath Service";

/// How many of the most recent occurrences a member must have missed.
pub const RECENT_OCCURRENCES: usize = 3;

/// An active member with no recorded presence at the scanned occurrences.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Absentee {
    #[serde(flatten)]
    pub member: Member,
    pub missed_events: Vec<String>,
}

/// Outcome of one retention scan.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RetentionReport {
    /// Dates that were checked, most recent first.
    pub service_dates: Vec<String>,
    pub absentees: Vec<Absentee>,
}

/// Distinct dates of events called `event_name`, most recent first, capped at `limit`.
///
/// Dates that do not parse sort after every valid date.
pub fn recent_event_dates(events: &[Event], event_name: &str, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut dates: Vec<&str> = events
        .iter()
        .filter(|e| e.name == event_name)
        .map(|e| e.date.as_str())
        .filter(|date| seen.insert(*date))
        .collect();

    dates.sort_by(|a, b| match (parse_date(a), parse_date(b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    dates.into_iter().take(limit).map(str::to_string).collect()
}

/// Flag every active member with zero `Present` rows for `event_name` on its
/// three most recent dates.
///
/// When no event carries that name the date set is empty, so every active
/// member is flagged.
pub fn scan_for_absentees(
    members: &[Member],
    events: &[Event],
    attendance: &[AttendanceRecord],
    event_name: &str,
) -> RetentionReport {
    let service_dates = recent_event_dates(events, event_name, RECENT_OCCURRENCES);

    let present: HashSet<&str> = attendance
        .iter()
        .filter(|att| {
            att.event_name == event_name
                && att.status == AttendanceStatus::Present
                && service_dates.contains(&att.date)
        })
        .map(|att| att.member_name.as_str())
        .collect();

    let absentees = members
        .iter()
        .filter(|m| m.status == MemberStatus::Active)
        .filter(|m| !present.contains(m.full_name.as_str()))
        .map(|m| Absentee {
            member: m.clone(),
            missed_events: service_dates.clone(),
        })
        .collect();

    RetentionReport {
        service_dates,
        absentees,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(date: &str) -> Event {
        named_event(SABBATH_SERVICE, date)
    }

    fn named_event(name: &str, date: &str) -> Event {
        Event {
            id: format!("{name}-{date}"),
            name: name.to_string(),
            date: date.to_string(),
            event_type: "Worship".to_string(),
            responsible_community: "General".to_string(),
            location: None,
            start_date: None,
            start_time: None,
            end_date: None,
            end_time: None,
        }
    }

    fn member(name: &str, status: MemberStatus) -> Member {
        Member {
            id: name.to_string(),
            full_name: name.to_string(),
            phone: String::new(),
            email: String::new(),
            address: None,
            passport_photo_url: None,
            status,
            assigned_community: String::new(),
            join_date: String::new(),
        }
    }

    fn mark(name: &str, event: &str, date: &str, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            date: date.to_string(),
            event_name: event.to_string(),
            member_name: name.to_string(),
            status,
        }
    }

    fn names(report: &RetentionReport) -> Vec<&str> {
        report
            .absentees
            .iter()
            .map(|a| a.member.full_name.as_str())
            .collect()
    }

    #[test]
    fn test_recent_dates_are_distinct_newest_first() {
        let events = vec![
            service("2025-05-03"),
            service("2025-05-24"),
            service("2025-05-10"),
            service("2025-05-24"),
            service("2025-05-17"),
            named_event("Choir Practice", "2025-05-31"),
        ];

        assert_eq!(
            recent_event_dates(&events, SABBATH_SERVICE, 3),
            vec!["2025-05-24", "2025-05-17", "2025-05-10"]
        );
    }

    #[test]
    fn test_unparseable_dates_sort_last() {
        let events = vec![service("someday"), service("2025-05-03")];
        assert_eq!(
            recent_event_dates(&events, SABBATH_SERVICE, 3),
            vec!["2025-05-03", "someday"]
        );
    }

    #[test]
    fn test_flags_only_active_members_with_no_presence() {
        let events = vec![
            service("2025-05-03"),
            service("2025-05-10"),
            service("2025-05-17"),
            service("2025-05-24"),
        ];
        let members = vec![
            member("Present Once", MemberStatus::Active),
            member("Never Came", MemberStatus::Active),
            member("Marked Absent", MemberStatus::Active),
            member("Came Long Ago", MemberStatus::Active),
            member("Other Event Only", MemberStatus::Active),
            member("Inactive Person", MemberStatus::Inactive),
            member("Visiting Person", MemberStatus::Visitor),
        ];
        let attendance = vec![
            mark("Present Once", SABBATH_SERVICE, "2025-05-10", AttendanceStatus::Present),
            mark("Marked Absent", SABBATH_SERVICE, "2025-05-24", AttendanceStatus::Absent),
            mark("Came Long Ago", SABBATH_SERVICE, "2025-05-03", AttendanceStatus::Present),
            mark("Other Event Only", "Choir Practice", "2025-05-24", AttendanceStatus::Present),
        ];

        let report = scan_for_absentees(&members, &events, &attendance, SABBATH_SERVICE);

        assert_eq!(report.service_dates, vec!["2025-05-24", "2025-05-17", "2025-05-10"]);
        assert_eq!(
            names(&report),
            vec!["Never Came", "Marked Absent", "Came Long Ago", "Other Event Only"]
        );
        assert!(report
            .absentees
            .iter()
            .all(|a| a.missed_events == report.service_dates));
    }

    #[test]
    fn test_no_service_events_flags_every_active_member() {
        let members = vec![
            member("A", MemberStatus::Active),
            member("B", MemberStatus::Inactive),
        ];
        let attendance = vec![mark("A", SABBATH_SERVICE, "2025-05-03", AttendanceStatus::Present)];

        let report = scan_for_absentees(&members, &[], &attendance, SABBATH_SERVICE);

        assert!(report.service_dates.is_empty());
        assert_eq!(names(&report), vec!["A"]);
    }

    #[test]
    fn test_name_matching_is_exact() {
        let events = vec![service("2025-05-03")];
        let members = vec![member("Grace Mollel", MemberStatus::Active)];
        let attendance = vec![mark(
            "grace mollel",
            SABBATH_SERVICE,
            "2025-05-03",
            AttendanceStatus::Present,
        )];

        let report = scan_for_absentees(&members, &events, &attendance, SABBATH_SERVICE);
        assert_eq!(names(&report), vec!["Grace Mollel"]);
    }
}
