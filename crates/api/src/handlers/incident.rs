//! Handlers for the `/incidents` resource.
//!
//! An incident's `organizationId` is always injected from the authenticated
//! context, never read from the request body. The referenced service must
//! exist within the caller's organization, both at creation and whenever
//! the incident is reassigned.

use axum::extract::{Path, State};
use axum::Json;
use validator::Validate;
use vigil_core::error::CoreError;
use vigil_core::types::DbId;
use vigil_db::models::incident::{CreateIncident, Incident, UpdateIncident};
use vigil_db::repositories::{IncidentRepo, ServiceRepo};
use vigil_events::StatusEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::OrgContext;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{ApiResponse, AppJson};
use crate::state::AppState;

/// Reject a `service` reference that does not resolve within the caller's
/// organization. A foreign-org service is indistinguishable from a missing
/// one.
async fn ensure_service_in_org(
    state: &AppState,
    service_id: DbId,
    org_id: &str,
) -> AppResult<()> {
    ServiceRepo::find_by_id(&state.pool, service_id, org_id)
        .await?
        .ok_or(AppError::Core(CoreError::Validation(format!(
            "Referenced service {service_id} does not exist in this organization"
        ))))?;
    Ok(())
}

/// POST /api/incidents
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(ctx): RequireAdmin,
    AppJson(input): AppJson<CreateIncident>,
) -> AppResult<Json<ApiResponse<Incident>>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    ensure_service_in_org(&state, input.service, &ctx.organization_id).await?;

    let incident = IncidentRepo::create(&state.pool, &ctx.organization_id, &input).await?;

    state
        .event_bus
        .publish(StatusEvent::incident_created(
            &ctx.organization_id,
            incident.clone(),
        ));

    Ok(ApiResponse::success(
        "Incident created successfully",
        incident,
    ))
}

/// GET /api/incidents
pub async fn list(
    State(state): State<AppState>,
    ctx: OrgContext,
) -> AppResult<Json<ApiResponse<Vec<Incident>>>> {
    let incidents = IncidentRepo::list(&state.pool, &ctx.organization_id).await?;
    Ok(ApiResponse::success(
        "Incidents retrieved successfully",
        incidents,
    ))
}

/// GET /api/incidents/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Incident>>> {
    let incident = IncidentRepo::find_by_id(&state.pool, id, &ctx.organization_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Incident",
            id,
        }))?;
    Ok(ApiResponse::success(
        "Incident retrieved successfully",
        incident,
    ))
}

/// PUT /api/incidents/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(ctx): RequireAdmin,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateIncident>,
) -> AppResult<Json<ApiResponse<Incident>>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    // Reassignment revalidates the new service; the stored organization id
    // is never re-derived from it.
    if let Some(service_id) = input.service {
        ensure_service_in_org(&state, service_id, &ctx.organization_id).await?;
    }

    let incident = IncidentRepo::update(&state.pool, id, &ctx.organization_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Incident",
            id,
        }))?;

    state
        .event_bus
        .publish(StatusEvent::incident_updated(
            &ctx.organization_id,
            incident.clone(),
        ));

    Ok(ApiResponse::success(
        "Incident updated successfully",
        incident,
    ))
}

/// DELETE /api/incidents/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(ctx): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Incident>>> {
    let incident = IncidentRepo::delete(&state.pool, id, &ctx.organization_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Incident",
            id,
        }))?;

    state
        .event_bus
        .publish(StatusEvent::incident_deleted(&ctx.organization_id, id));

    Ok(ApiResponse::success(
        "Incident deleted successfully",
        incident,
    ))
}
