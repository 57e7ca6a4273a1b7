//! Repository for the `incidents` table.

use sqlx::{PgPool, Postgres, Transaction};
use vigil_core::types::DbId;

use crate::models::incident::{CreateIncident, Incident, UpdateIncident};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, description, status, service_id, organization_id, created_at, updated_at";

/// Provides organization-scoped CRUD operations for incidents.
pub struct IncidentRepo;

impl IncidentRepo {
    /// Insert a new incident, returning the created row.
    ///
    /// `org_id` comes from the authenticated request context and is stored
    /// as the incident's denormalized organization id; it is never taken
    /// from client input. If `status` is `None`, defaults to New.
    pub async fn create(
        pool: &PgPool,
        org_id: &str,
        input: &CreateIncident,
    ) -> Result<Incident, sqlx::Error> {
        let query = format!(
            "INSERT INTO incidents (title, description, status, service_id, organization_id)
             VALUES ($1, $2, COALESCE($3, 'New'::incident_status), $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Incident>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status)
            .bind(input.service)
            .bind(org_id)
            .fetch_one(pool)
            .await
    }

    /// Find an incident by id within the given organization.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        org_id: &str,
    ) -> Result<Option<Incident>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM incidents WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Incident>(&query)
            .bind(id)
            .bind(org_id)
            .fetch_optional(pool)
            .await
    }

    /// List all incidents of an organization, newest first.
    pub async fn list(pool: &PgPool, org_id: &str) -> Result<Vec<Incident>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM incidents
             WHERE organization_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Incident>(&query)
            .bind(org_id)
            .fetch_all(pool)
            .await
    }

    /// List the incidents affecting one service, newest first.
    pub async fn list_by_service(
        pool: &PgPool,
        service_id: DbId,
        org_id: &str,
    ) -> Result<Vec<Incident>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM incidents
             WHERE service_id = $1 AND organization_id = $2
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Incident>(&query)
            .bind(service_id)
            .bind(org_id)
            .fetch_all(pool)
            .await
    }

    /// Update an incident. Only non-`None` fields in `input` are applied.
    ///
    /// The stored `organization_id` is never rewritten here, even when the
    /// incident is reassigned to a different service.
    ///
    /// Returns `None` if no row matches both `id` and `org_id`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        org_id: &str,
        input: &UpdateIncident,
    ) -> Result<Option<Incident>, sqlx::Error> {
        let query = format!(
            "UPDATE incidents SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                service_id = COALESCE($6, service_id),
                updated_at = NOW()
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Incident>(&query)
            .bind(id)
            .bind(org_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status)
            .bind(input.service)
            .fetch_optional(pool)
            .await
    }

    /// Delete an incident by id within the given organization, returning
    /// the deleted row.
    pub async fn delete(
        pool: &PgPool,
        id: DbId,
        org_id: &str,
    ) -> Result<Option<Incident>, sqlx::Error> {
        let query = format!(
            "DELETE FROM incidents WHERE id = $1 AND organization_id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Incident>(&query)
            .bind(id)
            .bind(org_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete every incident referencing a service, within the caller's
    /// transaction. Used by the cascading service delete.
    ///
    /// Returns the number of rows removed.
    pub async fn delete_by_service(
        tx: &mut Transaction<'_, Postgres>,
        service_id: DbId,
        org_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM incidents WHERE service_id = $1 AND organization_id = $2")
                .bind(service_id)
                .bind(org_id)
                .execute(&mut **tx)
                .await?;
        Ok(result.rows_affected())
    }
}
