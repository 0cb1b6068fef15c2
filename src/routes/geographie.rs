use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::warn;

use crate::database::queries::{CommuneCompteRow, Queries};
use crate::error::ApiError;
use crate::geo::{
    analyser_buffer, compter_fallback, grille_densite, intersection_cercles,
    valider_coordonnees, zones_depuis_comptes, Bbox, Cercle,
};
use crate::state::AppState;

pub async fn contours(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let communes = Queries::list_communes(state.db.pool()).await?;

    let features: Vec<Value> = communes
        .iter()
        .filter_map(|c| {
            let geometrie: Value = serde_json::from_str(c.contour_geojson.as_deref()?).ok()?;
            Some(json!({
                "type": "Feature",
                "geometry": geometrie,
                "properties": {
                    "id": c.id,
                    "nom": c.nom,
                    "region": c.region,
                    "departement": c.departement,
                }
            }))
        })
        .collect();

    Ok(Json(json!({
        "success": true,
        "data": {
            "type": "FeatureCollection",
            "features": features,
        }
    })))
}

/// Spatial join first, pure-Rust containment when PostGIS is unavailable.
pub(crate) async fn comptes_par_commune_avec_repli(
    pool: &PgPool,
) -> Result<(Vec<CommuneCompteRow>, &'static str), ApiError> {
    match Queries::compte_spatial_par_commune(pool).await {
        Ok(comptes) => Ok((comptes, "postgis")),
        Err(e) => {
            warn!("Jointure spatiale indisponible, repli côté serveur: {}", e);
            let communes = Queries::list_communes(pool).await?;
            let points = Queries::list_points(pool).await?;
            Ok((compter_fallback(&communes, &points), "fallback"))
        }
    }
}

pub async fn zones_blanches(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let (comptes, source) = comptes_par_commune_avec_repli(state.db.pool()).await?;
    let zones = zones_depuis_comptes(&comptes);
    Ok(Json(json!({
        "success": true,
        "data": {
            "zones": zones,
            "nb_communes_analysees": comptes.len(),
            "source": source,
        }
    })))
}

fn valider_cercle(cercle: &Cercle) -> Result<(), ApiError> {
    valider_coordonnees(cercle.lat, cercle.lng).map_err(ApiError::Validation)?;
    if cercle.rayon_km <= 0.0 || cercle.rayon_km > 500.0 {
        return Err(ApiError::Validation(format!(
            "rayon invalide: {} km",
            cercle.rayon_km
        )));
    }
    Ok(())
}

pub async fn buffer(
    State(state): State<AppState>,
    Json(cercle): Json<Cercle>,
) -> Result<Json<Value>, ApiError> {
    valider_cercle(&cercle)?;
    let points = Queries::list_points(state.db.pool()).await?;
    let resultat = analyser_buffer(&cercle, &points);
    Ok(Json(json!({ "success": true, "data": resultat })))
}

#[derive(Debug, Deserialize)]
pub struct IntersectionPayload {
    pub cercle_a: Cercle,
    pub cercle_b: Cercle,
}

pub async fn intersection(
    Json(payload): Json<IntersectionPayload>,
) -> Result<Json<Value>, ApiError> {
    valider_cercle(&payload.cercle_a)?;
    valider_cercle(&payload.cercle_b)?;
    let resultat = intersection_cercles(&payload.cercle_a, &payload.cercle_b);
    Ok(Json(json!({ "success": true, "data": resultat })))
}

#[derive(Debug, Deserialize)]
pub struct DensitePayload {
    pub bbox: Bbox,
    pub taille_km: f64,
}

pub async fn densite(
    State(state): State<AppState>,
    Json(payload): Json<DensitePayload>,
) -> Result<Json<Value>, ApiError> {
    let points = Queries::list_points(state.db.pool()).await?;
    let cellules =
        grille_densite(&payload.bbox, payload.taille_km, &points).map_err(ApiError::Validation)?;
    Ok(Json(json!({
        "success": true,
        "data": {
            "taille_km": payload.taille_km,
            "cellules": cellules,
        }
    })))
}
