//! Route definitions for the `/incidents` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::incident;
use crate::state::AppState;

/// Routes mounted at `/incidents`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(incident::list).post(incident::create))
        .route(
            "/{id}",
            get(incident::get_by_id)
                .put(incident::update)
                .delete(incident::delete),
        )
}
