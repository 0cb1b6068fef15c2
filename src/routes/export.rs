use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::database::queries::{Queries, RessourceFiltre};
use crate::error::ApiError;
use crate::export::csv;
use crate::state::AppState;

fn reponse_csv(nom_fichier: &str, contenu: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", nom_fichier),
            ),
        ],
        contenu,
    )
        .into_response()
}

pub async fn ressources_csv(
    State(state): State<AppState>,
    Query(filtre): Query<RessourceFiltre>,
) -> Result<Response, ApiError> {
    let pool = state.db.pool();
    let ressources = Queries::list_ressources(pool, &filtre).await?;
    let types = Queries::list_types(pool).await?;
    let communes = Queries::list_communes(pool).await?;

    let contenu = csv::ressources_en_csv(&ressources, &types, &communes);
    Ok(reponse_csv("ressources.csv", contenu))
}

pub async fn ressources_json(
    State(state): State<AppState>,
    Query(filtre): Query<RessourceFiltre>,
) -> Result<Response, ApiError> {
    let ressources = Queries::list_ressources(state.db.pool(), &filtre).await?;
    let corps = Json(json!({
        "success": true,
        "exporte_le": chrono::Utc::now(),
        "total": ressources.len(),
        "data": ressources,
    }));
    Ok((
        [(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"ressources.json\"".to_string(),
        )],
        corps,
    )
        .into_response())
}

pub async fn statistiques_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let comptes = Queries::compte_par_commune(state.db.pool()).await?;
    let contenu = csv::statistiques_en_csv("commune", &comptes);
    Ok(reponse_csv("statistiques.csv", contenu))
}
