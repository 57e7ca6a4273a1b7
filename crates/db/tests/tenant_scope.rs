//! Integration tests for the organization-scoped repository layer.
//!
//! Exercises the repositories against a real database:
//! - Tenant isolation: a row from another organization reads as absent
//! - Denormalized organization id set at creation, stable across updates
//! - Enum vocabulary enforcement at the store boundary
//! - Cascading service delete (incidents removed in the same transaction)
//! - Per-organization name uniqueness

use sqlx::PgPool;
use vigil_db::models::incident::{CreateIncident, UpdateIncident};
use vigil_db::models::service::{CreateService, UpdateService};
use vigil_db::models::status::{IncidentStatus, ServiceStatus};
use vigil_db::repositories::{IncidentRepo, ServiceRepo};

const ORG_A: &str = "org_1";
const ORG_B: &str = "org_2";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_service(name: &str) -> CreateService {
    CreateService {
        name: name.to_string(),
        description: None,
        status: None,
    }
}

fn new_incident(service: vigil_core::types::DbId, title: &str) -> CreateIncident {
    CreateIncident {
        title: title.to_string(),
        description: "something is wrong".to_string(),
        service,
        status: None,
    }
}

// ---------------------------------------------------------------------------
// Tenant isolation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn service_from_other_org_reads_as_absent(pool: PgPool) {
    let service = ServiceRepo::create(&pool, ORG_A, &new_service("API"))
        .await
        .unwrap();

    let found = ServiceRepo::find_by_id(&pool, service.id, ORG_B).await.unwrap();
    assert!(found.is_none(), "cross-org lookup must be indistinguishable from not-found");

    let found = ServiceRepo::find_by_id(&pool, service.id, ORG_A).await.unwrap();
    assert_eq!(found.unwrap().id, service.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn cross_org_update_and_delete_match_nothing(pool: PgPool) {
    let service = ServiceRepo::create(&pool, ORG_A, &new_service("API"))
        .await
        .unwrap();

    let patch = UpdateService {
        name: None,
        description: None,
        status: Some(ServiceStatus::MajorOutage),
    };
    let updated = ServiceRepo::update(&pool, service.id, ORG_B, &patch).await.unwrap();
    assert!(updated.is_none());

    let deleted = ServiceRepo::delete(&pool, service.id, ORG_B).await.unwrap();
    assert!(deleted.is_none());

    // The row is untouched for its owner.
    let found = ServiceRepo::find_by_id(&pool, service.id, ORG_A)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.status, ServiceStatus::Operational);
}

#[sqlx::test(migrations = "./migrations")]
async fn listings_are_scoped_per_organization(pool: PgPool) {
    ServiceRepo::create(&pool, ORG_A, &new_service("API")).await.unwrap();
    ServiceRepo::create(&pool, ORG_A, &new_service("Web")).await.unwrap();
    ServiceRepo::create(&pool, ORG_B, &new_service("API")).await.unwrap();

    let a = ServiceRepo::list(&pool, ORG_A).await.unwrap();
    let b = ServiceRepo::list(&pool, ORG_B).await.unwrap();
    assert_eq!(a.len(), 2);
    assert_eq!(b.len(), 1);
    assert!(a.iter().all(|s| s.organization_id == ORG_A));
}

#[sqlx::test(migrations = "./migrations")]
async fn incident_scoping_mirrors_service_scoping(pool: PgPool) {
    let service = ServiceRepo::create(&pool, ORG_A, &new_service("API"))
        .await
        .unwrap();
    let incident = IncidentRepo::create(&pool, ORG_A, &new_incident(service.id, "Down"))
        .await
        .unwrap();

    assert!(IncidentRepo::find_by_id(&pool, incident.id, ORG_B)
        .await
        .unwrap()
        .is_none());
    assert!(IncidentRepo::delete(&pool, incident.id, ORG_B)
        .await
        .unwrap()
        .is_none());
    assert_eq!(IncidentRepo::list(&pool, ORG_B).await.unwrap().len(), 0);
    assert_eq!(IncidentRepo::list(&pool, ORG_A).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Denormalized organization id
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn incident_org_is_set_at_creation_and_never_rederived(pool: PgPool) {
    let first = ServiceRepo::create(&pool, ORG_A, &new_service("API"))
        .await
        .unwrap();
    let second = ServiceRepo::create(&pool, ORG_A, &new_service("Web"))
        .await
        .unwrap();

    let incident = IncidentRepo::create(&pool, ORG_A, &new_incident(first.id, "Down"))
        .await
        .unwrap();
    assert_eq!(incident.organization_id, ORG_A);

    // Reassigning to a different service leaves the stored org untouched.
    let patch = UpdateIncident {
        title: None,
        description: None,
        status: None,
        service: Some(second.id),
    };
    let updated = IncidentRepo::update(&pool, incident.id, ORG_A, &patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.service_id, second.id);
    assert_eq!(updated.organization_id, ORG_A);
}

// ---------------------------------------------------------------------------
// Enum enforcement at the store boundary
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn out_of_vocabulary_status_is_rejected_by_the_store(pool: PgPool) {
    let result = sqlx::query(
        "INSERT INTO services (name, status, organization_id) VALUES ($1, 'Foo', $2)",
    )
    .bind("API")
    .bind(ORG_A)
    .execute(&pool)
    .await;
    assert!(result.is_err(), "invalid service_status must never persist");

    let service = ServiceRepo::create(&pool, ORG_A, &new_service("API"))
        .await
        .unwrap();
    let result = sqlx::query(
        "UPDATE incidents SET status = 'Broken' WHERE organization_id = $1",
    )
    .bind(ORG_A)
    .execute(&pool)
    .await;
    assert!(result.is_err(), "invalid incident_status must never persist");

    // Sanity: the valid vocabulary still round-trips.
    let incident = IncidentRepo::create(
        &pool,
        ORG_A,
        &CreateIncident {
            title: "Down".to_string(),
            description: "hard down".to_string(),
            service: service.id,
            status: Some(IncidentStatus::Escalated),
        },
    )
    .await
    .unwrap();
    assert_eq!(incident.status, IncidentStatus::Escalated);
}

// ---------------------------------------------------------------------------
// Cascading delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn deleting_a_service_removes_its_incidents_atomically(pool: PgPool) {
    let service = ServiceRepo::create(&pool, ORG_A, &new_service("API"))
        .await
        .unwrap();
    IncidentRepo::create(&pool, ORG_A, &new_incident(service.id, "Down"))
        .await
        .unwrap();
    IncidentRepo::create(&pool, ORG_A, &new_incident(service.id, "Slow"))
        .await
        .unwrap();

    let deleted = ServiceRepo::delete(&pool, service.id, ORG_A)
        .await
        .unwrap()
        .expect("owner delete should match");
    assert_eq!(deleted.id, service.id);

    // No orphaned incidents remain visible to any organization-scoped listing.
    assert_eq!(IncidentRepo::list(&pool, ORG_A).await.unwrap().len(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn failed_service_delete_leaves_incidents_in_place(pool: PgPool) {
    let service = ServiceRepo::create(&pool, ORG_A, &new_service("API"))
        .await
        .unwrap();
    IncidentRepo::create(&pool, ORG_A, &new_incident(service.id, "Down"))
        .await
        .unwrap();

    // Wrong org: the transaction rolls back, incidents survive.
    let deleted = ServiceRepo::delete(&pool, service.id, ORG_B).await.unwrap();
    assert!(deleted.is_none());
    assert_eq!(IncidentRepo::list(&pool, ORG_A).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Name uniqueness per organization
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn service_names_are_unique_within_an_org_only(pool: PgPool) {
    ServiceRepo::create(&pool, ORG_A, &new_service("API")).await.unwrap();

    let duplicate = ServiceRepo::create(&pool, ORG_A, &new_service("API")).await;
    assert!(duplicate.is_err(), "same name in the same org must conflict");

    // The same name under a different organization is fine.
    let other = ServiceRepo::create(&pool, ORG_B, &new_service("API")).await;
    assert!(other.is_ok());
}
