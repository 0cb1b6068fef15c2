use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::warn;

use crate::database::queries::Queries;
use crate::error::ApiError;
use crate::meteo::MeteoActuelle;
use crate::state::AppState;

pub async fn actuelle(
    State(state): State<AppState>,
    Path(commune): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let commune = Queries::get_commune_par_nom(state.db.pool(), &commune)
        .await?
        .ok_or_else(|| ApiError::Introuvable("Commune introuvable".to_string()))?;

    // Upstream failure degrades to a marked placeholder, never a 5xx.
    let meteo = match state.meteo.actuelle(&commune).await {
        Ok(meteo) => meteo,
        Err(e) => {
            warn!("Open-Meteo injoignable pour {}: {}", commune.nom, e);
            MeteoActuelle::indisponible(&commune.nom)
        }
    };

    Ok(Json(json!({ "success": true, "data": meteo })))
}
