//! Repositories and the status synchronizer against a real embedded database

mod common;

use aurora_server::Config;
use aurora_server::db::DbService;
use aurora_server::db::models::{InventoryItem, MaintenanceRequest, Tenant};
use aurora_server::db::repository::tenant::TenantFilter;
use aurora_server::services::synchronize_all;
use chrono::{DateTime, Duration, TimeZone, Utc};
use common::test_state;
use shared::PageQuery;
use shared::models::{
    Condition, InventoryCategory, InventoryStatus, MaintenanceStatus, MaintenanceType, Priority,
    RentalBasis, TenantStatus,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

/// Tenant stored with whatever status it is given, stale or not
fn tenant(
    name: &str,
    checkin: DateTime<Utc>,
    checkout: Option<DateTime<Utc>>,
    status: TenantStatus,
) -> Tenant {
    Tenant {
        id: None,
        name: name.into(),
        phone: "555-0100".into(),
        email: String::new(),
        apartment_number: "A1".into(),
        checkin_date: checkin,
        checkout_date: checkout,
        rental_basis: RentalBasis::Monthly,
        rent_amount: 900.0,
        deposit: 0.0,
        booking_source: None,
        special_requests: String::new(),
        remarks: String::new(),
        id_verification: Default::default(),
        current_rental_period: Default::default(),
        status,
        total_rent: 900.0,
        created_at: checkin,
        updated_at: checkin,
    }
}

fn request(
    apartment: &str,
    priority: Priority,
    status: MaintenanceStatus,
    reported: DateTime<Utc>,
) -> MaintenanceRequest {
    let completed = status == MaintenanceStatus::Completed;
    MaintenanceRequest {
        id: None,
        apartment_number: apartment.into(),
        kind: MaintenanceType::Plumbing,
        description: "Dripping shower".into(),
        priority,
        status,
        reported_date: reported,
        completed_date: completed.then_some(reported + Duration::days(1)),
        assigned_to: String::new(),
        estimated_cost: 0.0,
        actual_cost: 0.0,
        previous_condition: String::new(),
        post_departure_condition: String::new(),
        damages: String::new(),
        deposit_deductions: 0.0,
        notes: String::new(),
        images: Vec::new(),
        created_at: reported,
        updated_at: reported,
    }
}

fn item(
    kind: &str,
    next_maintenance: Option<DateTime<Utc>>,
    status: InventoryStatus,
) -> InventoryItem {
    InventoryItem {
        id: None,
        apartment_number: "B2".into(),
        category: InventoryCategory::Appliances,
        kind: kind.into(),
        count: 1,
        condition: Condition::Good,
        brand: String::new(),
        model: String::new(),
        purchase_date: None,
        purchase_price: 0.0,
        warranty_expiry: None,
        location: String::new(),
        notes: String::new(),
        status,
        last_maintenance: None,
        next_maintenance,
        images: Vec::new(),
        specifications: Default::default(),
        created_at: now(),
        updated_at: now(),
    }
}

#[tokio::test]
async fn test_tenant_crud_roundtrip() {
    let state = test_state().await;
    let repo = state.tenants();

    let created = repo
        .create(tenant("alice", now() - Duration::days(3), None, TenantStatus::Active))
        .await
        .unwrap();
    let id = created.id.clone().unwrap().to_string();
    assert!(id.starts_with("tenant:"));

    let mut fetched = repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "alice");
    assert_eq!(fetched.checkin_date, now() - Duration::days(3));

    fetched.remarks = "quiet".into();
    let saved = repo.save(&fetched).await.unwrap();
    assert_eq!(saved.remarks, "quiet");
    assert_eq!(saved.id, created.id);

    assert!(repo.delete(&id).await.unwrap());
    assert!(!repo.delete(&id).await.unwrap());
    assert!(repo.find_by_id(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_tenant_list_filters_and_counts() {
    let state = test_state().await;
    let repo = state.tenants();

    for (name, status) in [
        ("anna", TenantStatus::Active),
        ("bert", TenantStatus::Inactive),
        ("cleo", TenantStatus::Active),
    ] {
        repo.create(tenant(name, now(), None, status)).await.unwrap();
    }

    let filter = TenantFilter {
        status: Some(TenantStatus::Active),
        sort_by: Some("name".into()),
        sort_order: shared::SortOrder::Asc,
        ..Default::default()
    };
    let page = PageQuery { page: Some(1), limit: Some(1) };
    let (rows, total) = repo.list(&filter, &page).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "anna");

    // unknown sort fields fall back to the default
    let filter = TenantFilter {
        sort_by: Some("password; DROP".into()),
        ..Default::default()
    };
    let (rows, total) = repo.list(&filter, &PageQuery::default()).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn test_synchronizer_persists_stale_statuses() {
    let state = test_state().await;
    let repo = state.tenants();

    // stored as active but checked out yesterday
    let left = repo
        .create(tenant(
            "left",
            now() - Duration::days(10),
            Some(now() - Duration::days(1)),
            TenantStatus::Active,
        ))
        .await
        .unwrap();
    // stored as pending but check-in has passed
    let arrived = repo
        .create(tenant("arrived", now() - Duration::hours(2), None, TenantStatus::Pending))
        .await
        .unwrap();
    repo.create(tenant("settled", now() - Duration::days(5), None, TenantStatus::Active))
        .await
        .unwrap();

    let report = synchronize_all(&repo, now(), 4).await.unwrap();
    assert_eq!(report.updated, 2);
    assert!(report.failed.is_empty());

    let left = repo.find_by_id(&left.id.unwrap().to_string()).await.unwrap().unwrap();
    assert_eq!(left.status, TenantStatus::Inactive);
    assert_eq!(left.updated_at, now());
    let arrived = repo.find_by_id(&arrived.id.unwrap().to_string()).await.unwrap().unwrap();
    assert_eq!(arrived.status, TenantStatus::Active);

    // second pass has nothing to do
    let report = synchronize_all(&repo, now(), 4).await.unwrap();
    assert_eq!(report.updated, 0);
}

#[tokio::test]
async fn test_synchronizer_recomputes_daily_total_rent() {
    let state = test_state().await;
    let repo = state.tenants();

    // checked in 5 days ago, left yesterday; saved while still active at 2 days
    let mut stay = tenant(
        "weekender",
        now() - Duration::days(5),
        Some(now() - Duration::days(1)),
        TenantStatus::Active,
    );
    stay.rental_basis = RentalBasis::Daily;
    stay.rent_amount = 100.0;
    stay.total_rent = 200.0;
    let stay = repo.create(stay).await.unwrap();

    let report = synchronize_all(&repo, now(), 2).await.unwrap();
    assert_eq!(report.updated, 1);

    let stored = repo.find_by_id(&stay.id.unwrap().to_string()).await.unwrap().unwrap();
    assert_eq!(stored.status, TenantStatus::Inactive);
    assert_eq!(stored.total_rent, 400.0);

    let report = synchronize_all(&repo, now(), 2).await.unwrap();
    assert_eq!(report.updated, 0);
}

#[tokio::test]
async fn test_synchronizer_fixes_total_rent_when_status_is_current() {
    let state = test_state().await;
    let repo = state.tenants();

    let mut stay = tenant(
        "long-stay",
        now() - Duration::days(3),
        None,
        TenantStatus::Active,
    );
    stay.rental_basis = RentalBasis::Daily;
    stay.rent_amount = 50.0;
    stay.total_rent = 50.0;
    let stay = repo.create(stay).await.unwrap();

    let report = synchronize_all(&repo, now(), 2).await.unwrap();
    assert_eq!(report.updated, 1);

    let stored = repo.find_by_id(&stay.id.unwrap().to_string()).await.unwrap().unwrap();
    assert_eq!(stored.status, TenantStatus::Active);
    assert_eq!(stored.total_rent, 150.0);
}

#[tokio::test]
async fn test_update_derived_of_missing_tenant() {
    let state = test_state().await;
    let result = state
        .tenants()
        .update_derived("ghost", TenantStatus::Inactive, 0.0, now())
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_maintenance_queries() {
    let state = test_state().await;
    let repo = state.maintenance();

    let base = now() - Duration::days(10);
    repo.create(request("1", Priority::Low, MaintenanceStatus::Pending, base))
        .await
        .unwrap();
    let high = request("1", Priority::High, MaintenanceStatus::Pending, base + Duration::days(2));
    repo.create(high).await.unwrap();
    let started = request(
        "2",
        Priority::Urgent,
        MaintenanceStatus::InProgress,
        base + Duration::days(1),
    );
    repo.create(started).await.unwrap();
    repo.create(request("2", Priority::Urgent, MaintenanceStatus::Completed, base))
        .await
        .unwrap();

    let pending = repo.find_pending().await.unwrap();
    let priorities: Vec<Priority> = pending.iter().map(|r| r.priority).collect();
    assert_eq!(priorities, vec![Priority::High, Priority::Low]);

    let urgent = repo.find_urgent().await.unwrap();
    assert_eq!(urgent.len(), 1);
    assert_eq!(urgent[0].status, MaintenanceStatus::InProgress);

    let (completed, total) = repo.find_completed(&PageQuery::default()).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(completed[0].completed_date, Some(base + Duration::days(1)));

    let by_apartment = repo.find_by_apartment("1").await.unwrap();
    assert_eq!(by_apartment[0].priority, Priority::High);
}

#[tokio::test]
async fn test_inventory_maintenance_due_skips_retired_and_unscheduled() {
    let state = test_state().await;
    let repo = state.inventory();

    repo.create(item("later", Some(now() - Duration::days(1)), InventoryStatus::Available))
        .await
        .unwrap();
    repo.create(item("first", Some(now() - Duration::days(5)), InventoryStatus::InUse))
        .await
        .unwrap();
    repo.create(item("retired", Some(now() - Duration::days(9)), InventoryStatus::Retired))
        .await
        .unwrap();
    repo.create(item("future", Some(now() + Duration::days(9)), InventoryStatus::Available))
        .await
        .unwrap();
    repo.create(item("never", None, InventoryStatus::Available))
        .await
        .unwrap();

    let due = repo.find_maintenance_due(now()).await.unwrap();
    let kinds: Vec<&str> = due.iter().map(|i| i.kind.as_str()).collect();
    assert_eq!(kinds, vec!["first", "later"]);
}

#[tokio::test]
async fn test_rocksdb_storage_persists_records() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("database");
    let config = Config::with_overrides(
        dir.path().to_string_lossy(),
        db_path.to_string_lossy(),
    );

    let service = DbService::open(&config).await.unwrap();
    let state = aurora_server::ServerState::new(config, service.db);
    let repo = state.tenants();

    let created = repo
        .create(tenant("disk", now(), None, TenantStatus::Active))
        .await
        .unwrap();
    let fetched = repo
        .find_by_id(&created.id.unwrap().to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.name, "disk");
    assert!(db_path.exists());
}
