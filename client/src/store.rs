//! Local snapshot of every collection, kept in step with the server.
//!
//! Each mutation goes to the server first and is followed by a full re-fetch,
//! so the snapshot only ever reflects what the server returned.

use chrono::NaiveDate;
use shepherd_shared::insights::{
    self, CommunityStats, ContributionFilter, DashboardStats, GivingTotals, MemberFilter,
    MemberStats, RetentionReport, SABBATH_SERVICE,
};
use shepherd_shared::models::{
    AttendanceRecord, Community, Contribution, Event, Member, MessageResponse,
    UpdateCommunityRequest, UpdateContributionRequest, UpdateEventRequest, UpdateMemberRequest,
};

use crate::{ClientResult, HttpClient};

/// The five collections as last fetched.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub members: Vec<Member>,
    pub communities: Vec<Community>,
    pub events: Vec<Event>,
    pub attendance: Vec<AttendanceRecord>,
    pub contributions: Vec<Contribution>,
}

impl Snapshot {
    pub fn member_stats(&self, today: NaiveDate) -> Vec<MemberStats> {
        insights::member_stats(&self.members, &self.attendance, &self.contributions, today)
    }

    pub fn filter_members(&self, filter: &MemberFilter) -> Vec<&Member> {
        insights::filter_members(&self.members, filter)
    }

    pub fn community_stats(&self) -> Vec<CommunityStats> {
        insights::community_stats(&self.communities, &self.members)
    }

    /// Active members absent from the last three Sabbath services.
    pub fn retention_scan(&self) -> RetentionReport {
        insights::scan_for_absentees(
            &self.members,
            &self.events,
            &self.attendance,
            SABBATH_SERVICE,
        )
    }

    pub fn attendance_log(&self, date: Option<&str>) -> Vec<&AttendanceRecord> {
        insights::attendance_log(&self.attendance, date)
    }

    pub fn filter_contributions(
        &self,
        filter: &ContributionFilter,
        today: NaiveDate,
    ) -> Vec<&Contribution> {
        insights::filter_contributions(&self.contributions, filter, today)
    }

    /// Totals over the contributions `filter` selects.
    pub fn giving_totals(&self, filter: &ContributionFilter, today: NaiveDate) -> GivingTotals {
        insights::giving_totals(self.filter_contributions(filter, today))
    }

    pub fn dashboard(&self, today: NaiveDate) -> DashboardStats {
        insights::dashboard_stats(&self.members, &self.contributions, today)
    }
}

/// Replace a failed fetch with an empty collection.
fn or_empty<T>(collection: &str, result: ClientResult<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!("Failed to fetch {}: {}", collection, e);
        Vec::new()
    })
}

/// Client-side data store.
pub struct Store {
    client: HttpClient,
    snapshot: Snapshot,
}

impl Store {
    /// Check the server is reachable, then load every collection.
    pub async fn connect(client: HttpClient) -> Self {
        match client.health().await {
            Ok(true) => tracing::info!("Connected to {}", client.base_url()),
            Ok(false) => tracing::warn!("Health check failed for {}", client.base_url()),
            Err(e) => tracing::warn!("Server {} unreachable: {}", client.base_url(), e),
        }

        let mut store = Self {
            client,
            snapshot: Snapshot::default(),
        };
        store.refresh().await;
        store
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut HttpClient {
        &mut self.client
    }

    /// Re-fetch all five collections concurrently.
    pub async fn refresh(&mut self) {
        let (members, communities, events, attendance, contributions) = tokio::join!(
            self.client.list_members(),
            self.client.list_communities(),
            self.client.list_events(),
            self.client.list_attendance(),
            self.client.list_contributions(),
        );

        self.snapshot = Snapshot {
            members: or_empty("members", members),
            communities: or_empty("communities", communities),
            events: or_empty("events", events),
            attendance: or_empty("attendance", attendance),
            contributions: or_empty("contributions", contributions),
        };
        tracing::debug!(
            "Snapshot refreshed: {} members, {} events",
            self.snapshot.members.len(),
            self.snapshot.events.len()
        );
    }

    // ==================== MEMBERS ====================

    pub async fn add_member(&mut self, member: &Member) -> ClientResult<Member> {
        let result = self.client.create_member(member).await;
        self.refresh().await;
        result
    }

    pub async fn update_member(
        &mut self,
        id: &str,
        changes: &UpdateMemberRequest,
    ) -> ClientResult<Member> {
        let result = self.client.update_member(id, changes).await;
        self.refresh().await;
        result
    }

    pub async fn delete_member(&mut self, id: &str) -> ClientResult<MessageResponse> {
        let result = self.client.delete_member(id).await;
        self.refresh().await;
        result
    }

    // ==================== COMMUNITIES ====================

    pub async fn add_community(&mut self, community: &Community) -> ClientResult<Community> {
        let result = self.client.create_community(community).await;
        self.refresh().await;
        result
    }

    pub async fn update_community(
        &mut self,
        id: &str,
        changes: &UpdateCommunityRequest,
    ) -> ClientResult<Community> {
        let result = self.client.update_community(id, changes).await;
        self.refresh().await;
        result
    }

    pub async fn delete_community(&mut self, id: &str) -> ClientResult<MessageResponse> {
        let result = self.client.delete_community(id).await;
        self.refresh().await;
        result
    }

    // ==================== EVENTS ====================

    pub async fn add_event(&mut self, event: &Event) -> ClientResult<Event> {
        let result = self.client.create_event(event).await;
        self.refresh().await;
        result
    }

    pub async fn update_event(
        &mut self,
        id: &str,
        changes: &UpdateEventRequest,
    ) -> ClientResult<Event> {
        let result = self.client.update_event(id, changes).await;
        self.refresh().await;
        result
    }

    pub async fn delete_event(&mut self, id: &str) -> ClientResult<MessageResponse> {
        let result = self.client.delete_event(id).await;
        self.refresh().await;
        result
    }

    // ==================== ATTENDANCE & GIVING ====================

    pub async fn add_attendance(
        &mut self,
        record: &AttendanceRecord,
    ) -> ClientResult<AttendanceRecord> {
        let result = self.client.create_attendance(record).await;
        self.refresh().await;
        result
    }

    pub async fn add_contribution(
        &mut self,
        contribution: &Contribution,
    ) -> ClientResult<Contribution> {
        let result = self.client.create_contribution(contribution).await;
        self.refresh().await;
        result
    }

    pub async fn update_contribution(
        &mut self,
        id: &str,
        changes: &UpdateContributionRequest,
    ) -> ClientResult<Contribution> {
        let result = self.client.update_contribution(id, changes).await;
        self.refresh().await;
        result
    }
}
