//! HTTP API routes

pub mod extract;
pub mod health;
pub mod lists;
pub mod members;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::error::ServiceError;
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, ServiceError>;

/// List and member resources
fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/lists", post(lists::create))
        .route(
            "/lists/{list_id}",
            get(lists::show).put(lists::update).delete(lists::remove),
        )
        .route("/lists/{list_id}/members", post(members::create))
        .route(
            "/lists/{list_id}/members/{member_id}",
            get(members::show)
                .put(members::update)
                .delete(members::remove),
        )
}

/// Create the combined router
///
/// Resources are served both at the root and under `/mailchimp`.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(resource_routes())
        .nest("/mailchimp", resource_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
