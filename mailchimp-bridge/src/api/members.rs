//! Member endpoints, nested under a list

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Map, Value};

use super::ApiResult;
use super::extract::AttributesBody;
use crate::state::AppState;

/// POST /lists/{list_id}/members
pub async fn create(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    AttributesBody(attrs): AttributesBody,
) -> ApiResult<Map<String, Value>> {
    Ok(Json(state.members.create(&list_id, &attrs).await?))
}

/// PUT /lists/{list_id}/members/{member_id}
pub async fn update(
    State(state): State<AppState>,
    Path((list_id, member_id)): Path<(String, String)>,
    AttributesBody(attrs): AttributesBody,
) -> ApiResult<Map<String, Value>> {
    Ok(Json(state.members.update(&list_id, &member_id, &attrs).await?))
}

/// DELETE /lists/{list_id}/members/{member_id}
pub async fn remove(
    State(state): State<AppState>,
    Path((list_id, member_id)): Path<(String, String)>,
) -> ApiResult<Map<String, Value>> {
    state.members.remove(&list_id, &member_id).await?;
    Ok(Json(Map::new()))
}

/// GET /lists/{list_id}/members/{member_id}
pub async fn show(
    State(state): State<AppState>,
    Path((list_id, member_id)): Path<(String, String)>,
) -> ApiResult<Map<String, Value>> {
    Ok(Json(state.members.show(&list_id, &member_id).await?))
}
