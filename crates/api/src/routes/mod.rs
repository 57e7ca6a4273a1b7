pub mod health;
pub mod incident;
pub mod service;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                              WebSocket (token via query parameter)
///
/// /services                        list, create
/// /services/{id}                   get, update, delete (cascades incidents)
/// /services/{id}/incidents         incidents affecting one service
///
/// /incidents                       list, create
/// /incidents/{id}                  get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket endpoint.
        .route("/ws", get(ws::ws_handler))
        // Status resources.
        .nest("/services", service::router())
        .nest("/incidents", incident::router())
}
