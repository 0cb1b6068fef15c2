use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::{hacher_mot_de_passe, AuthUser, Capacite, Role};
use crate::database::queries::{MiseAJourUtilisateur, NouvelUtilisateur, Queries};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn liste_utilisateurs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, ApiError> {
    auth.exiger(Capacite::GererUtilisateurs)?;
    let utilisateurs = Queries::list_utilisateurs(state.db.pool()).await?;
    Ok(Json(json!({ "success": true, "data": utilisateurs })))
}

pub async fn creer_utilisateur(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(nouvel): Json<NouvelUtilisateur>,
) -> Result<Json<Value>, ApiError> {
    auth.exiger(Capacite::GererUtilisateurs)?;

    if nouvel.nom.trim().is_empty() {
        return Err(ApiError::Validation("Le nom est obligatoire".to_string()));
    }
    if !nouvel.email.contains('@') {
        return Err(ApiError::Validation("Email invalide".to_string()));
    }
    if nouvel.password.len() < 8 {
        return Err(ApiError::Validation(
            "Le mot de passe doit compter au moins 8 caractères".to_string(),
        ));
    }
    nouvel.role.parse::<Role>().map_err(ApiError::Validation)?;

    if Queries::find_utilisateur_par_email(state.db.pool(), &nouvel.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Validation("Email déjà utilisé".to_string()));
    }

    let hash = hacher_mot_de_passe(&state.config.hash_salt, &nouvel.password);
    let utilisateur = Queries::insert_utilisateur(state.db.pool(), &nouvel, &hash).await?;

    info!(
        "Utilisateur {} créé par {}",
        utilisateur.email, auth.utilisateur.email
    );
    Ok(Json(json!({ "success": true, "data": utilisateur })))
}

pub async fn modifier_utilisateur(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    Json(maj): Json<MiseAJourUtilisateur>,
) -> Result<Json<Value>, ApiError> {
    auth.exiger(Capacite::GererUtilisateurs)?;

    if let Some(role) = &maj.role {
        role.parse::<Role>().map_err(ApiError::Validation)?;
    }

    let utilisateur = Queries::update_utilisateur(state.db.pool(), id, &maj)
        .await?
        .ok_or_else(|| ApiError::Introuvable("Utilisateur introuvable".to_string()))?;
    Ok(Json(json!({ "success": true, "data": utilisateur })))
}

/// Deactivation rather than deletion, audit rows keep their author.
pub async fn supprimer_utilisateur(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    auth.exiger(Capacite::GererUtilisateurs)?;

    if id == auth.utilisateur.id {
        return Err(ApiError::Validation(
            "Impossible de désactiver son propre compte".to_string(),
        ));
    }

    let trouve = Queries::desactiver_utilisateur(state.db.pool(), id).await?;
    if !trouve {
        return Err(ApiError::Introuvable("Utilisateur introuvable".to_string()));
    }
    Ok(Json(json!({ "success": true })))
}
