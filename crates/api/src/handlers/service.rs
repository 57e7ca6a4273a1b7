//! Handlers for the `/services` resource.
//!
//! Reads require organization membership; writes require the admin role.

use axum::extract::{Path, State};
use axum::Json;
use validator::Validate;
use vigil_core::error::CoreError;
use vigil_core::types::DbId;
use vigil_db::models::incident::Incident;
use vigil_db::models::service::{CreateService, Service, UpdateService};
use vigil_db::repositories::{IncidentRepo, ServiceRepo};
use vigil_events::StatusEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::OrgContext;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{ApiResponse, AppJson};
use crate::state::AppState;

/// POST /api/services
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(ctx): RequireAdmin,
    AppJson(input): AppJson<CreateService>,
) -> AppResult<Json<ApiResponse<Service>>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let service = ServiceRepo::create(&state.pool, &ctx.organization_id, &input).await?;

    state
        .event_bus
        .publish(StatusEvent::service_created(
            &ctx.organization_id,
            service.clone(),
        ));

    Ok(ApiResponse::success("Service created successfully", service))
}

/// GET /api/services
pub async fn list(
    State(state): State<AppState>,
    ctx: OrgContext,
) -> AppResult<Json<ApiResponse<Vec<Service>>>> {
    let services = ServiceRepo::list(&state.pool, &ctx.organization_id).await?;
    Ok(ApiResponse::success(
        "Services retrieved successfully",
        services,
    ))
}

/// GET /api/services/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Service>>> {
    let service = ServiceRepo::find_by_id(&state.pool, id, &ctx.organization_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Service",
            id,
        }))?;
    Ok(ApiResponse::success(
        "Service retrieved successfully",
        service,
    ))
}

/// PUT /api/services/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(ctx): RequireAdmin,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateService>,
) -> AppResult<Json<ApiResponse<Service>>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let service = ServiceRepo::update(&state.pool, id, &ctx.organization_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Service",
            id,
        }))?;

    state
        .event_bus
        .publish(StatusEvent::service_updated(
            &ctx.organization_id,
            service.clone(),
        ));

    Ok(ApiResponse::success("Service updated successfully", service))
}

/// DELETE /api/services/{id}
///
/// Cascade-deletes the service's incidents in the same transaction; clients
/// reconcile the cascade from the single `service` delete event.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(ctx): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Service>>> {
    let service = ServiceRepo::delete(&state.pool, id, &ctx.organization_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Service",
            id,
        }))?;

    state
        .event_bus
        .publish(StatusEvent::service_deleted(&ctx.organization_id, id));

    Ok(ApiResponse::success("Service deleted successfully", service))
}

/// GET /api/services/{id}/incidents
pub async fn list_incidents(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<Incident>>>> {
    // 404 for a missing/foreign service rather than an empty list.
    ServiceRepo::find_by_id(&state.pool, id, &ctx.organization_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Service",
            id,
        }))?;

    let incidents = IncidentRepo::list_by_service(&state.pool, id, &ctx.organization_id).await?;
    Ok(ApiResponse::success(
        "Incidents retrieved successfully",
        incidents,
    ))
}
