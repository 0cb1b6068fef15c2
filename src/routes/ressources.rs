use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::{json, Value};

use crate::auth::{peut_modifier_ressource, AuthUser, Capacite};
use crate::database::models::{EtatUtilisation, Potentiel};
use crate::database::queries::{Queries, RessourceFiltre, RessourcePayload};
use crate::error::ApiError;
use crate::geo::valider_coordonnees;
use crate::state::AppState;

fn valider_filtre(filtre: &RessourceFiltre) -> Result<(), ApiError> {
    if let Some(p) = &filtre.potentiel {
        p.parse::<Potentiel>().map_err(ApiError::Validation)?;
    }
    if let Some(e) = &filtre.etat_utilisation {
        e.parse::<EtatUtilisation>().map_err(ApiError::Validation)?;
    }
    Ok(())
}

/// Validation layer: vocabulary and referential checks run before any SQL
/// write, malformed input never reaches the database.
async fn valider_payload(state: &AppState, payload: &RessourcePayload) -> Result<(), ApiError> {
    if payload.nom.trim().is_empty() {
        return Err(ApiError::Validation("Le nom est obligatoire".to_string()));
    }
    payload
        .potentiel
        .parse::<Potentiel>()
        .map_err(ApiError::Validation)?;
    payload
        .etat_utilisation
        .parse::<EtatUtilisation>()
        .map_err(ApiError::Validation)?;
    valider_coordonnees(payload.latitude, payload.longitude).map_err(ApiError::Validation)?;

    if !Queries::commune_existe(state.db.pool(), payload.commune_id).await? {
        return Err(ApiError::Validation(format!(
            "Commune inexistante: {}",
            payload.commune_id
        )));
    }
    if !Queries::type_existe(state.db.pool(), payload.type_ressource_id).await? {
        return Err(ApiError::Validation(format!(
            "Type de ressource inexistant: {}",
            payload.type_ressource_id
        )));
    }
    Ok(())
}

pub async fn liste(
    State(state): State<AppState>,
    Query(filtre): Query<RessourceFiltre>,
) -> Result<Json<Value>, ApiError> {
    valider_filtre(&filtre)?;
    let ressources = Queries::list_ressources(state.db.pool(), &filtre).await?;
    Ok(Json(json!({
        "success": true,
        "data": ressources,
        "total": ressources.len(),
    })))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let ressource = Queries::get_ressource(state.db.pool(), id)
        .await?
        .ok_or_else(|| ApiError::Introuvable("Ressource introuvable".to_string()))?;
    Ok(Json(json!({ "success": true, "data": ressource })))
}

pub async fn creer(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RessourcePayload>,
) -> Result<Json<Value>, ApiError> {
    auth.exiger(Capacite::CreerRessource)?;
    valider_payload(&state, &payload).await?;

    let ressource =
        Queries::insert_ressource(state.db.pool(), &payload, auth.utilisateur.id).await?;
    Ok(Json(json!({ "success": true, "data": ressource })))
}

pub async fn modifier(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<RessourcePayload>,
) -> Result<Json<Value>, ApiError> {
    let existante = Queries::get_ressource(state.db.pool(), id)
        .await?
        .ok_or_else(|| ApiError::Introuvable("Ressource introuvable".to_string()))?;

    if !peut_modifier_ressource(auth.role, auth.utilisateur.id, existante.created_by) {
        return Err(ApiError::Autorisation("Accès refusé".to_string()));
    }

    valider_payload(&state, &payload).await?;

    let ressource = Queries::update_ressource(state.db.pool(), id, &payload)
        .await?
        .ok_or_else(|| ApiError::Introuvable("Ressource introuvable".to_string()))?;
    Ok(Json(json!({ "success": true, "data": ressource })))
}

pub async fn supprimer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let existante = Queries::get_ressource(state.db.pool(), id)
        .await?
        .ok_or_else(|| ApiError::Introuvable("Ressource introuvable".to_string()))?;

    if !peut_modifier_ressource(auth.role, auth.utilisateur.id, existante.created_by) {
        return Err(ApiError::Autorisation("Accès refusé".to_string()));
    }

    Queries::delete_ressource(state.db.pool(), id).await?;
    Ok(Json(json!({ "success": true })))
}
