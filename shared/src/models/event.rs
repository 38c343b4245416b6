//! Church event model.

use serde::{Deserialize, Serialize};

/// A scheduled event. Attendance rows refer to it by `name` and `date`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub date: String,
    #[serde(rename = "type", default)]
    pub event_type: String,
    #[serde(default)]
    pub responsible_community: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// Request body for updating an event. Omitted fields keep their stored value;
/// an explicit `null` clears the location and the start/end fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_community: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "super::explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "super::explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "super::explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "super::explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<Option<String>>,
}

impl From<&Event> for UpdateEventRequest {
    fn from(event: &Event) -> Self {
        Self {
            name: Some(event.name.clone()),
            date: Some(event.date.clone()),
            event_type: Some(event.event_type.clone()),
            responsible_community: Some(event.responsible_community.clone()),
            location: Some(event.location.clone()),
            start_date: Some(event.start_date.clone()),
            start_time: Some(event.start_time.clone()),
            end_date: Some(event.end_date.clone()),
            end_time: Some(event.end_time.clone()),
        }
    }
}
