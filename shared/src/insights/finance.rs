//! Contribution filtering and giving totals.

use std::cmp::Reverse;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::parse_date;
use crate::models::{Contribution, ContributionType};

/// Date window relative to "today" for the finance view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateWindow {
    #[default]
    All,
    /// Within 7 days of today.
    Week,
    /// Same calendar month and year as today.
    Month,
    /// Between 8 and 14 days from today.
    LastWeek,
    /// The calendar month before today's.
    LastMonth,
    /// Inclusive bounds; a missing bound is open.
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let distance = (today - date).num_days().abs();
        match *self {
            DateWindow::All => true,
            DateWindow::Week => distance <= 7,
            DateWindow::LastWeek => distance > 7 && distance <= 14,
            DateWindow::Month => date.year() == today.year() && date.month() == today.month(),
            DateWindow::LastMonth => {
                let (year, month) = previous_month(today);
                date.year() == year && date.month() == month
            }
            DateWindow::Custom { start, end } => {
                start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
            }
        }
    }
}

fn previous_month(today: NaiveDate) -> (i32, u32) {
    if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    }
}

/// Finance view filter.
#[derive(Debug, Clone, Default)]
pub struct ContributionFilter {
    /// Case-insensitive substring of the member name; empty matches everything.
    pub search: String,
    pub contribution_type: Option<ContributionType>,
    pub year: Option<i32>,
    pub window: DateWindow,
}

impl ContributionFilter {
    /// Year and window filters reject contributions whose date does not parse.
    pub fn matches(&self, contribution: &Contribution, today: NaiveDate) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty() && !contribution.member_name.to_lowercase().contains(&needle) {
            return false;
        }

        if self
            .contribution_type
            .is_some_and(|t| t != contribution.contribution_type)
        {
            return false;
        }

        if self.year.is_none() && self.window == DateWindow::All {
            return true;
        }

        let Some(date) = parse_date(&contribution.date) else {
            return false;
        };

        self.year.map_or(true, |y| date.year() == y) && self.window.contains(date, today)
    }
}

/// Matching contributions, newest first.
pub fn filter_contributions<'a>(
    contributions: &'a [Contribution],
    filter: &ContributionFilter,
    today: NaiveDate,
) -> Vec<&'a Contribution> {
    let mut matched: Vec<&Contribution> = contributions
        .iter()
        .filter(|c| filter.matches(c, today))
        .collect();
    matched.sort_by_key(|c| Reverse(parse_date(&c.date)));
    matched
}

/// Summary figures over a set of contributions.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct GivingTotals {
    pub total: f64,
    pub tithes: f64,
    /// Everything that is not a tithe.
    pub offerings: f64,
}

pub fn giving_totals<'a, I>(contributions: I) -> GivingTotals
where
    I: IntoIterator<Item = &'a Contribution>,
{
    contributions
        .into_iter()
        .fold(GivingTotals::default(), |mut totals, c| {
            totals.total += c.amount;
            match c.contribution_type {
                ContributionType::Tithe => totals.tithes += c.amount,
                _ => totals.offerings += c.amount,
            }
            totals
        })
}
