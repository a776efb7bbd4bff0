//! List endpoints

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Map, Value};

use super::ApiResult;
use super::extract::AttributesBody;
use crate::state::AppState;

/// POST /lists
pub async fn create(
    State(state): State<AppState>,
    AttributesBody(attrs): AttributesBody,
) -> ApiResult<Map<String, Value>> {
    Ok(Json(state.lists.create(&attrs).await?))
}

/// PUT /lists/{list_id}
pub async fn update(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    AttributesBody(attrs): AttributesBody,
) -> ApiResult<Map<String, Value>> {
    Ok(Json(state.lists.update(&list_id, &attrs).await?))
}

/// DELETE /lists/{list_id}
pub async fn remove(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> ApiResult<Map<String, Value>> {
    state.lists.remove(&list_id).await?;
    Ok(Json(Map::new()))
}

/// GET /lists/{list_id}
pub async fn show(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> ApiResult<Map<String, Value>> {
    Ok(Json(state.lists.show(&list_id).await?))
}
