//! Headline figures for the dashboard.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::parse_date;
use crate::models::{Contribution, Member, MemberStatus};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyGiving {
    pub name: &'static str,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_members: usize,
    /// Giving dated in today's month and year.
    pub monthly_giving: f64,
    /// Percentage of members with a non-empty community; 0 with no members.
    pub participation_rate: f64,
    /// Twelve entries, January first, for today's year.
    pub giving_by_month: Vec<MonthlyGiving>,
}

pub fn dashboard_stats(
    members: &[Member],
    contributions: &[Contribution],
    today: NaiveDate,
) -> DashboardStats {
    let active_members = members
        .iter()
        .filter(|m| m.status == MemberStatus::Active)
        .count();

    let participation_rate = if members.is_empty() {
        0.0
    } else {
        let assigned = members
            .iter()
            .filter(|m| !m.assigned_community.is_empty())
            .count();
        assigned as f64 / members.len() as f64 * 100.0
    };

    let mut by_month = [0.0_f64; 12];
    for contribution in contributions {
        if let Some(date) = parse_date(&contribution.date) {
            if date.year() == today.year() {
                by_month[date.month0() as usize] += contribution.amount;
            }
        }
    }

    DashboardStats {
        active_members,
        monthly_giving: by_month[today.month0() as usize],
        participation_rate,
        giving_by_month: MONTH_LABELS
            .into_iter()
            .zip(by_month)
            .map(|(name, amount)| MonthlyGiving { name, amount })
            .collect(),
    }
}
