//! Community (small group) model.

use serde::{Deserialize, Serialize};

/// A small group that meets regularly at a host's location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub host_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub meeting_day: String,
    #[serde(default)]
    pub max_capacity: i64,
}

/// Request body for updating a community.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommunityRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<i64>,
}

impl From<&Community> for UpdateCommunityRequest {
    fn from(community: &Community) -> Self {
        Self {
            name: Some(community.name.clone()),
            host_name: Some(community.host_name.clone()),
            location: Some(community.location.clone()),
            meeting_day: Some(community.meeting_day.clone()),
            max_capacity: Some(community.max_capacity),
        }
    }
}
