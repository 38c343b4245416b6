//! Derived member fields and roster filtering.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::parse_date;
use crate::models::{AttendanceRecord, Contribution, Member, MemberStatus};

/// A member together with the fields computed from attendance and giving.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberStats {
    #[serde(flatten)]
    pub member: Member,
    /// Attendance rows (any status) whose member name equals `full_name`.
    pub attendance_frequency: usize,
    /// Sum of this member's contributions dated in `today`'s year, up to `today`.
    pub total_contribution_ytd: f64,
}

/// Count attendance rows recorded under `member_name`.
pub fn attendance_count(member_name: &str, attendance: &[AttendanceRecord]) -> usize {
    attendance
        .iter()
        .filter(|record| record.member_name == member_name)
        .count()
}

/// Sum contributions recorded under `member_name` in the year to `today`.
pub fn giving_ytd(member_name: &str, contributions: &[Contribution], today: NaiveDate) -> f64 {
    contributions
        .iter()
        .filter(|c| c.member_name == member_name && in_year_to_date(&c.date, today))
        .map(|c| c.amount)
        .sum()
}

fn in_year_to_date(date: &str, today: NaiveDate) -> bool {
    parse_date(date).is_some_and(|d| d.year() == today.year() && d <= today)
}

/// Attach derived attendance and giving figures to every member.
pub fn member_stats(
    members: &[Member],
    attendance: &[AttendanceRecord],
    contributions: &[Contribution],
    today: NaiveDate,
) -> Vec<MemberStats> {
    let mut visits: HashMap<&str, usize> = HashMap::new();
    for record in attendance {
        *visits.entry(record.member_name.as_str()).or_default() += 1;
    }

    let mut giving: HashMap<&str, f64> = HashMap::new();
    for contribution in contributions
        .iter()
        .filter(|c| in_year_to_date(&c.date, today))
    {
        *giving.entry(contribution.member_name.as_str()).or_default() += contribution.amount;
    }

    members
        .iter()
        .map(|member| MemberStats {
            member: member.clone(),
            attendance_frequency: visits
                .get(member.full_name.as_str())
                .copied()
                .unwrap_or(0),
            total_contribution_ytd: giving
                .get(member.full_name.as_str())
                .copied()
                .unwrap_or(0.0),
        })
        .collect()
}

/// Which community assignment a roster view should show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CommunityFilter {
    #[default]
    All,
    /// Members whose community string is empty.
    Unassigned,
    /// Members assigned to exactly this community name.
    Named(String),
}

/// Roster filter: free-text search, status and community.
#[derive(Debug, Clone, Default)]
pub struct MemberFilter {
    /// Case-insensitive substring of name, email or phone; empty matches everything.
    pub search: String,
    pub status: Option<MemberStatus>,
    pub community: CommunityFilter,
}

impl MemberFilter {
    pub fn matches(&self, member: &Member) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || member.full_name.to_lowercase().contains(&needle)
            || member.email.to_lowercase().contains(&needle)
            || member.phone.contains(&needle);

        let matches_status = self.status.map_or(true, |status| member.status == status);

        let matches_community = match &self.community {
            CommunityFilter::All => true,
            CommunityFilter::Unassigned => member.assigned_community.is_empty(),
            CommunityFilter::Named(name) => &member.assigned_community == name,
        };

        matches_search && matches_status && matches_community
    }
}

/// Apply a [`MemberFilter`] to a roster, preserving order.
pub fn filter_members<'a>(members: &'a [Member], filter: &MemberFilter) -> Vec<&'a Member> {
    members.iter().filter(|m| filter.matches(m)).collect()
}
