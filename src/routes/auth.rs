use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::{IpAddr, SocketAddr};
use tracing::info;

use crate::auth::{generer_token, verifier_mot_de_passe, AuthUser};
use crate::database::queries::Queries;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

fn ip_client(headers: &HeaderMap, connect_info: Option<&ConnectInfo<SocketAddr>>) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok())
        .or_else(|| connect_info.map(|ConnectInfo(addr)| addr.ip()))
        .unwrap_or(IpAddr::from([127, 0, 0, 1]))
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<Value>, ApiError> {
    let ip = ip_client(&headers, connect_info.as_ref());
    if !state.limiteur_login.autoriser(ip) {
        return Err(ApiError::TropDeRequetes);
    }

    let utilisateur = Queries::find_utilisateur_par_email(state.db.pool(), &payload.email)
        .await?
        .ok_or_else(|| ApiError::Authentification("Utilisateur non trouvé".to_string()))?;

    if !verifier_mot_de_passe(
        &state.config.hash_salt,
        &payload.password,
        &utilisateur.password_hash,
    ) {
        return Err(ApiError::Authentification("Mot de passe incorrect".to_string()));
    }

    if !utilisateur.actif {
        return Err(ApiError::Authentification("Compte désactivé".to_string()));
    }

    let token = generer_token(
        &utilisateur,
        &state.config.jwt_secret,
        state.config.jwt_duree_heures,
    )?;

    info!("Connexion de {} ({})", utilisateur.email, utilisateur.role);

    Ok(Json(json!({
        "success": true,
        "token": token,
        "user": utilisateur,
    })))
}

pub async fn me(auth: AuthUser) -> Json<Value> {
    Json(json!({
        "success": true,
        "user": auth.utilisateur,
    }))
}

pub async fn logout(auth: AuthUser) -> Json<Value> {
    info!("Déconnexion de {}", auth.utilisateur.email);
    Json(json!({ "success": true }))
}
