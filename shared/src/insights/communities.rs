//! Derived community fields.

use serde::Serialize;

use crate::models::{Community, Member};

/// A community with its computed head count and fill level.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommunityStats {
    #[serde(flatten)]
    pub community: Community,
    pub member_count: usize,
    /// `member_count / max_capacity` as a percentage; 0 when capacity is not positive.
    pub occupancy: f64,
}

/// Count members whose assigned community equals `community_name` exactly.
pub fn community_member_count(community_name: &str, members: &[Member]) -> usize {
    members
        .iter()
        .filter(|m| m.assigned_community == community_name)
        .count()
}

pub fn community_stats(communities: &[Community], members: &[Member]) -> Vec<CommunityStats> {
    communities
        .iter()
        .map(|community| {
            let member_count = community_member_count(&community.name, members);
            let occupancy = if community.max_capacity > 0 {
                member_count as f64 / community.max_capacity as f64 * 100.0
            } else {
                0.0
            };
            CommunityStats {
                community: community.clone(),
                member_count,
                occupancy,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemberStatus;

    fn community(name: &str, capacity: i64) -> Community {
        Community {
            id: name.to_lowercase(),
            name: name.to_string(),
            host_name: "Host".to_string(),
            location: "Arusha".to_string(),
            meeting_day: "Wednesday".to_string(),
            max_capacity: capacity,
        }
    }

    fn assigned(name: &str, community: &str) -> Member {
        Member {
            id: name.to_string(),
            full_name: name.to_string(),
            phone: String::new(),
            email: String::new(),
            address: None,
            passport_photo_url: None,
            status: MemberStatus::Active,
            assigned_community: community.to_string(),
            join_date: String::new(),
        }
    }

    #[test]
    fn test_member_count_is_case_sensitive() {
        let members = vec![
            assigned("A", "Upendo"),
            assigned("B", "Upendo"),
            assigned("C", "upendo"),
            assigned("D", "Upendo "),
            assigned("E", ""),
        ];

        assert_eq!(community_member_count("Upendo", &members), 2);
        assert_eq!(community_member_count("upendo", &members), 1);
    }

    #[test]
    fn test_occupancy_percentage() {
        let members = vec![assigned("A", "Upendo"), assigned("B", "Upendo")];
        let stats = community_stats(&[community("Upendo", 8), community("Amani", 0)], &members);

        assert_eq!(stats[0].member_count, 2);
        assert_eq!(stats[0].occupancy, 25.0);
        assert_eq!(stats[1].member_count, 0);
        assert_eq!(stats[1].occupancy, 0.0);
    }

    #[test]
    fn test_renamed_community_orphans_members() {
        let members = vec![assigned("A", "Upendo")];
        let stats = community_stats(&[community("Upendo Group", 10)], &members);
        assert_eq!(stats[0].member_count, 0);
    }
}
