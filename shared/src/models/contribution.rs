//! Financial contribution model.

use serde::{Deserialize, Serialize};

/// Kind of gift recorded against a member.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ContributionType {
    #[default]
    Tithe,
    Offering,
    Other,
}

impl ContributionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContributionType::Tithe => "Tithe",
            ContributionType::Offering => "Offering",
            ContributionType::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Tithe" => Some(ContributionType::Tithe),
            "Offering" => Some(ContributionType::Offering),
            "Other" => Some(ContributionType::Other),
            _ => None,
        }
    }
}

/// A recorded gift. `member_name` matches `Member::full_name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    #[serde(default)]
    pub id: String,
    pub date: String,
    pub member_name: String,
    pub amount: f64,
    #[serde(rename = "type", default)]
    pub contribution_type: ContributionType,
}

/// Request body for updating a contribution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContributionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub contribution_type: Option<ContributionType>,
}

impl From<&Contribution> for UpdateContributionRequest {
    fn from(contribution: &Contribution) -> Self {
        Self {
            date: Some(contribution.date.clone()),
            member_name: Some(contribution.member_name.clone()),
            amount: Some(contribution.amount),
            contribution_type: Some(contribution.contribution_type),
        }
    }
}
