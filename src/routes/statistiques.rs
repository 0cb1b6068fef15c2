use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::database::queries::Queries;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn dashboard(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let pool = state.db.pool();
    let total = Queries::compte_ressources(pool).await?;
    let par_type = Queries::compte_par_type(pool).await?;
    let par_commune = Queries::compte_par_commune(pool).await?;
    let par_potentiel = Queries::compte_par_potentiel(pool).await?;
    let par_etat = Queries::compte_par_etat(pool).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "total_ressources": total,
            "par_type": par_type,
            "par_commune": par_commune,
            "par_potentiel": par_potentiel,
            "par_etat_utilisation": par_etat,
        }
    })))
}

pub async fn par_commune(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let comptes = Queries::compte_par_commune(state.db.pool()).await?;
    Ok(Json(json!({ "success": true, "data": comptes })))
}

pub async fn par_type(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let comptes = Queries::compte_par_type(state.db.pool()).await?;
    Ok(Json(json!({ "success": true, "data": comptes })))
}
