//! Store and HTTP client against an in-process backend.

use std::sync::Arc;

use shepherd_backend::config::{Config, DatabaseTarget};
use shepherd_backend::db::{bootstrap_admin, init_database, Repository};
use shepherd_backend::{create_router, AppState};
use shepherd_client::insights::{MemberFilter, SABBATH_SERVICE};
use shepherd_client::models::{
    AttendanceRecord, AttendanceStatus, Community, Contribution, ContributionType,
    CreateUserRequest, Event, Member, MemberStatus, Role, UpdateMemberRequest, UpdateUserRequest,
};
use shepherd_client::{ClientConfig, ClientError, HttpClient, Store};
use tempfile::TempDir;

const ADMIN_EMAIL: &str = "admin@test.local";
const ADMIN_PASSWORD: &str = "admin-pass";

/// Start the backend on a random port and return its base URL.
async fn spawn_backend() -> (String, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        database: DatabaseTarget::Path(temp_dir.path().join("client.sqlite")),
        jwt_secret: "client-test-secret".to_string(),
        token_ttl_hours: 1,
        reset_ttl_minutes: 60,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "warn".to_string(),
        admin_email: ADMIN_EMAIL.to_string(),
        admin_password: Some(ADMIN_PASSWORD.to_string()),
        log_reset_tokens: false,
    };

    let pool = init_database(&config.database).await.unwrap();
    let repo = Arc::new(Repository::new(pool));
    bootstrap_admin(&repo, &config).await.unwrap();

    let app = create_router(AppState {
        repo,
        config: Arc::new(config),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    (format!("http://{}", addr), temp_dir)
}

async fn admin_client(base_url: &str) -> HttpClient {
    let mut client = ClientConfig::new(base_url).build_http_client().unwrap();
    client.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
    client
}

fn member(id: &str, name: &str, status: MemberStatus) -> Member {
    Member {
        id: id.to_string(),
        full_name: name.to_string(),
        phone: String::new(),
        email: String::new(),
        address: None,
        passport_photo_url: None,
        status,
        assigned_community: "Upendo".to_string(),
        join_date: "2023-01-01".to_string(),
    }
}

fn sabbath(id: &str, date: &str) -> Event {
    Event {
        id: id.to_string(),
        name: SABBATH_SERVICE.to_string(),
        date: date.to_string(),
        event_type: "Service".to_string(),
        responsible_community: "Upendo".to_string(),
        location: None,
        start_date: None,
        start_time: None,
        end_date: None,
        end_time: None,
    }
}

#[tokio::test]
async fn test_login_and_me() {
    let (base_url, _dir) = spawn_backend().await;
    let client = admin_client(&base_url).await;

    assert!(client.token().is_some());
    let me = client.me().await.unwrap();
    assert_eq!(me.email, ADMIN_EMAIL);
    assert_eq!(me.role, Role::Admin);
}

#[tokio::test]
async fn test_bad_login_maps_to_unauthorized() {
    let (base_url, _dir) = spawn_backend().await;
    let mut client = ClientConfig::new(&base_url).build_http_client().unwrap();

    let err = client.login(ADMIN_EMAIL, "wrong").await.unwrap_err();
    match err {
        ClientError::Unauthorized(message) => assert_eq!(message, "Invalid credentials"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(client.token().is_none());
}

#[tokio::test]
async fn test_store_refreshes_after_mutations() {
    let (base_url, _dir) = spawn_backend().await;
    let mut store = Store::connect(admin_client(&base_url).await).await;
    assert!(store.snapshot().members.is_empty());

    let created = store
        .add_member(&member("M1", "Amani Mwita", MemberStatus::Active))
        .await
        .unwrap();
    assert_eq!(created.id, "M1");
    assert_eq!(store.snapshot().members.len(), 1);

    let changes = UpdateMemberRequest {
        phone: Some("0700000001".to_string()),
        ..Default::default()
    };
    store.update_member("M1", &changes).await.unwrap();
    assert_eq!(store.snapshot().members[0].phone, "0700000001");

    store
        .add_community(&Community {
            id: "C1".to_string(),
            name: "Upendo".to_string(),
            host_name: "Mama Grace".to_string(),
            location: "Kijitonyama".to_string(),
            meeting_day: "Wednesday".to_string(),
            max_capacity: 4,
        })
        .await
        .unwrap();
    let stats = store.snapshot().community_stats();
    assert_eq!(stats[0].member_count, 1);
    assert_eq!(stats[0].occupancy, 25.0);

    store.delete_member("M1").await.unwrap();
    assert!(store.snapshot().members.is_empty());
}

#[tokio::test]
async fn test_ids_with_reserved_characters() {
    let (base_url, _dir) = spawn_backend().await;
    let mut store = Store::connect(admin_client(&base_url).await).await;

    // A plain "M" must survive operations on ids that start with it
    store.add_member(&member("M", "Plain Id", MemberStatus::Active)).await.unwrap();

    let awkward = ["M/7", "M?7", "M#7", "M%2F7"];
    for id in awkward {
        let created = store
            .add_member(&member(id, "Awkward Id", MemberStatus::Active))
            .await
            .unwrap();
        assert_eq!(created.id, id);
    }

    for id in awkward {
        let changes = UpdateMemberRequest {
            phone: Some(format!("phone-{}", id)),
            ..Default::default()
        };
        let updated = store.update_member(id, &changes).await.unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.phone, format!("phone-{}", id));
    }

    for id in awkward {
        store.delete_member(id).await.unwrap();
    }

    let remaining: Vec<&str> = store
        .snapshot()
        .members
        .iter()
        .map(|m| m.id.as_str())
        .collect();
    assert_eq!(remaining, vec!["M"]);
    assert_eq!(store.snapshot().members[0].phone, "");
}

#[tokio::test]
async fn test_failed_mutation_still_refreshes() {
    let (base_url, _dir) = spawn_backend().await;
    let mut store = Store::connect(admin_client(&base_url).await).await;

    let err = store
        .update_member("missing", &UpdateMemberRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));

    // A second client writes behind the store's back; the failed call above
    // is followed by a refresh, as is any later one.
    let other = admin_client(&base_url).await;
    other
        .create_member(&member("M2", "Neema Otieno", MemberStatus::Active))
        .await
        .unwrap();

    let err = store.delete_member("missing").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
    assert_eq!(store.snapshot().members.len(), 1);
}

#[tokio::test]
async fn test_retention_scan_over_store() {
    let (base_url, _dir) = spawn_backend().await;
    let mut store = Store::connect(admin_client(&base_url).await).await;

    store.add_member(&member("M1", "Amani Mwita", MemberStatus::Active)).await.unwrap();
    store.add_member(&member("M2", "Neema Otieno", MemberStatus::Active)).await.unwrap();
    store.add_member(&member("M3", "Baraka Juma", MemberStatus::Visitor)).await.unwrap();

    for (id, date) in [
        ("E1", "2024-02-24"),
        ("E2", "2024-03-02"),
        ("E3", "2024-03-09"),
        ("E4", "2024-03-16"),
    ] {
        store.add_event(&sabbath(id, date)).await.unwrap();
    }

    // Amani attended one of the last three; the oldest service does not count
    store
        .add_attendance(&AttendanceRecord {
            date: "2024-03-09".to_string(),
            event_name: SABBATH_SERVICE.to_string(),
            member_name: "Amani Mwita".to_string(),
            status: AttendanceStatus::Present,
        })
        .await
        .unwrap();
    store
        .add_attendance(&AttendanceRecord {
            date: "2024-02-24".to_string(),
            event_name: SABBATH_SERVICE.to_string(),
            member_name: "Neema Otieno".to_string(),
            status: AttendanceStatus::Present,
        })
        .await
        .unwrap();

    let report = store.snapshot().retention_scan();
    assert_eq!(
        report.service_dates,
        vec!["2024-03-16", "2024-03-09", "2024-03-02"]
    );
    let flagged: Vec<&str> = report
        .absentees
        .iter()
        .map(|a| a.member.full_name.as_str())
        .collect();
    assert_eq!(flagged, vec!["Neema Otieno"]);
}

#[tokio::test]
async fn test_contributions_and_member_filter() {
    let (base_url, _dir) = spawn_backend().await;
    let mut store = Store::connect(admin_client(&base_url).await).await;

    store.add_member(&member("M1", "Amani Mwita", MemberStatus::Active)).await.unwrap();
    store
        .add_contribution(&Contribution {
            id: String::new(),
            date: "2024-03-16".to_string(),
            member_name: "Amani Mwita".to_string(),
            amount: 5000.0,
            contribution_type: ContributionType::Tithe,
        })
        .await
        .unwrap();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.contributions.len(), 1);
    assert!(!snapshot.contributions[0].id.is_empty());

    let filter = MemberFilter {
        search: "amani".to_string(),
        ..Default::default()
    };
    assert_eq!(snapshot.filter_members(&filter).len(), 1);
}

#[tokio::test]
async fn test_user_management_rules() {
    let (base_url, _dir) = spawn_backend().await;
    let client = admin_client(&base_url).await;
    let me = client.me().await.unwrap();

    let err = client.delete_user(me.id).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    let staff = client
        .create_user(&CreateUserRequest {
            email: "staff@test.local".to_string(),
            password: "staff-pass".to_string(),
            name: "Staff".to_string(),
            role: None,
        })
        .await
        .unwrap();
    assert_eq!(staff.role, Role::User);

    let err = client
        .create_user(&CreateUserRequest {
            email: "staff@test.local".to_string(),
            password: "x".to_string(),
            name: String::new(),
            role: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Conflict(_)));

    let renamed = client
        .update_user(
            staff.id,
            &UpdateUserRequest {
                name: Some("Usher".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Usher");

    let mut staff_client = ClientConfig::new(&base_url).build_http_client().unwrap();
    staff_client.login("staff@test.local", "staff-pass").await.unwrap();
    let err = staff_client.list_users().await.unwrap_err();
    assert!(matches!(err, ClientError::Forbidden(_)));
}

#[tokio::test]
async fn test_unreachable_server_yields_empty_snapshot() {
    let client = ClientConfig::new("http://127.0.0.1:9")
        .with_timeout(2)
        .build_http_client()
        .unwrap();
    let store = Store::connect(client).await;

    let snapshot = store.snapshot();
    assert!(snapshot.members.is_empty());
    assert!(snapshot.events.is_empty());
    assert!(snapshot.retention_scan().absentees.is_empty());
}
