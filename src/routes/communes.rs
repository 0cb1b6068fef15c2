use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use crate::database::queries::Queries;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn liste(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let communes = Queries::list_communes(state.db.pool()).await?;
    Ok(Json(json!({ "success": true, "data": communes })))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let commune = Queries::get_commune(state.db.pool(), id)
        .await?
        .ok_or_else(|| ApiError::Introuvable("Commune introuvable".to_string()))?;
    Ok(Json(json!({ "success": true, "data": commune })))
}

pub async fn types_ressources(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let types = Queries::list_types(state.db.pool()).await?;
    Ok(Json(json!({ "success": true, "data": types })))
}
