//! Repository for the `services` table.

use sqlx::PgPool;
use vigil_core::types::DbId;

use crate::models::service::{CreateService, Service, UpdateService};
use crate::repositories::IncidentRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, status, organization_id, created_at, updated_at";

/// Provides organization-scoped CRUD operations for services.
pub struct ServiceRepo;

impl ServiceRepo {
    /// Insert a new service for the given organization, returning the
    /// created row.
    ///
    /// If `status` is `None`, defaults to Operational.
    pub async fn create(
        pool: &PgPool,
        org_id: &str,
        input: &CreateService,
    ) -> Result<Service, sqlx::Error> {
        let query = format!(
            "INSERT INTO services (name, description, status, organization_id)
             VALUES ($1, $2, COALESCE($3, 'Operational'::service_status), $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status)
            .bind(org_id)
            .fetch_one(pool)
            .await
    }

    /// Find a service by id within the given organization.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        org_id: &str,
    ) -> Result<Option<Service>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM services WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .bind(org_id)
            .fetch_optional(pool)
            .await
    }

    /// List all services of an organization, newest first.
    pub async fn list(pool: &PgPool, org_id: &str) -> Result<Vec<Service>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM services
             WHERE organization_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(org_id)
            .fetch_all(pool)
            .await
    }

    /// Update a service. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row matches both `id` and `org_id`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        org_id: &str,
        input: &UpdateService,
    ) -> Result<Option<Service>, sqlx::Error> {
        let query = format!(
            "UPDATE services SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                updated_at = NOW()
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .bind(org_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a service and all incidents referencing it, in one
    /// transaction, returning the deleted service row.
    ///
    /// Returns `None` (and leaves the incidents untouched) if no service
    /// matches both `id` and `org_id`.
    pub async fn delete(
        pool: &PgPool,
        id: DbId,
        org_id: &str,
    ) -> Result<Option<Service>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Dependent incidents first: the FK on incidents.service_id would
        // otherwise reject the service delete.
        let incidents_removed = IncidentRepo::delete_by_service(&mut tx, id, org_id).await?;

        let query = format!(
            "DELETE FROM services WHERE id = $1 AND organization_id = $2 RETURNING {COLUMNS}"
        );
        let service = sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .bind(org_id)
            .fetch_optional(&mut *tx)
            .await?;

        match service {
            Some(service) => {
                tx.commit().await?;
                tracing::debug!(
                    service_id = %id,
                    incidents_removed,
                    "Deleted service and dependent incidents"
                );
                Ok(Some(service))
            }
            None => {
                tx.rollback().await?;
                Ok(None)
            }
        }
    }
}
