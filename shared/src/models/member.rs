//! Congregation member model.

use serde::{Deserialize, Serialize};

/// Membership status of a person on the roll.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum MemberStatus {
    #[default]
    Active,
    Visitor,
    Inactive,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "Active",
            MemberStatus::Visitor => "Visitor",
            MemberStatus::Inactive => "Inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(MemberStatus::Active),
            "Visitor" => Some(MemberStatus::Visitor),
            "Inactive" => Some(MemberStatus::Inactive),
            _ => None,
        }
    }
}

/// A person on the congregation roll.
///
/// `assigned_community` holds a community *name*, not an id. Attendance and
/// contributions refer back to a member by `full_name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Caller-supplied identity; the server generates one when empty.
    #[serde(default)]
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_photo_url: Option<String>,
    #[serde(default)]
    pub status: MemberStatus,
    #[serde(default)]
    pub assigned_community: String,
    #[serde(default)]
    pub join_date: String,
}

/// Request body for updating a member. Omitted fields keep their stored value;
/// an explicit `null` clears `address` or `passportPhotoUrl`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub address: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "super::explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub passport_photo_url: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MemberStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_community: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
}

impl From<&Member> for UpdateMemberRequest {
    fn from(member: &Member) -> Self {
        Self {
            full_name: Some(member.full_name.clone()),
            phone: Some(member.phone.clone()),
            email: Some(member.email.clone()),
            address: Some(member.address.clone()),
            passport_photo_url: Some(member.passport_photo_url.clone()),
            status: Some(member.status),
            assigned_community: Some(member.assigned_community.clone()),
            join_date: Some(member.join_date.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_wire_format() {
        let member: Member = serde_json::from_value(serde_json::json!({
            "id": "M001",
            "fullName": "Neema Mushi",
            "phone": "0700000000",
            "email": "neema@example.org",
            "status": "Visitor",
            "assignedCommunity": "Upendo",
            "joinDate": "2024-02-11"
        }))
        .unwrap();

        assert_eq!(member.status, MemberStatus::Visitor);
        assert_eq!(member.assigned_community, "Upendo");
        assert!(member.address.is_none());

        let value = serde_json::to_value(&member).unwrap();
        assert_eq!(value["fullName"], "Neema Mushi");
        assert!(value.get("passportPhotoUrl").is_none());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let member: Member =
            serde_json::from_value(serde_json::json!({ "fullName": "Juma" })).unwrap();
        assert_eq!(member.id, "");
        assert_eq!(member.status, MemberStatus::Active);
        assert_eq!(member.assigned_community, "");
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let request: UpdateMemberRequest = serde_json::from_value(serde_json::json!({
            "phone": "0711111111",
            "address": null,
            "passportPhotoUrl": "https://example.org/p.jpg"
        }))
        .unwrap();
        assert_eq!(request.phone.as_deref(), Some("0711111111"));
        assert_eq!(request.address, Some(None));
        assert_eq!(
            request.passport_photo_url,
            Some(Some("https://example.org/p.jpg".to_string()))
        );
        assert!(request.email.is_none());

        let value = serde_json::to_value(&request).unwrap();
        assert!(value["address"].is_null());
        assert!(value.get("email").is_none());

        let empty: UpdateMemberRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(empty.address.is_none());
        assert!(empty.passport_photo_url.is_none());
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        assert_eq!(MemberStatus::parse("Inactive"), Some(MemberStatus::Inactive));
        assert_eq!(MemberStatus::parse("active"), None);
    }
}
