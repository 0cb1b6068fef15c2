pub mod rate_limit;
pub mod roles;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::database::models::Utilisateur;
use crate::database::queries::Queries;
use crate::error::ApiError;
use crate::state::AppState;

pub use roles::{peut_modifier_ressource, role_permet, Capacite, Role};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub role: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

pub fn generer_token(
    utilisateur: &Utilisateur,
    secret: &str,
    duree_heures: i64,
) -> Result<String, ApiError> {
    let maintenant = Utc::now();
    let claims = Claims {
        sub: utilisateur.id,
        role: utilisateur.role.clone(),
        jti: uuid::Uuid::new_v4().to_string(),
        iat: maintenant.timestamp(),
        exp: (maintenant + Duration::hours(duree_heures)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        warn!("Échec de signature du token: {}", e);
        ApiError::Interne
    })
}

pub fn decoder_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Authentification("Token invalide".to_string()))
}

/// Salted SHA-256, hex encoded. The salt comes from `HASH_SALT`.
pub fn hacher_mot_de_passe(sel: &str, mot_de_passe: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(sel.as_bytes());
    hasher.update(mot_de_passe.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn verifier_mot_de_passe(sel: &str, mot_de_passe: &str, hash_attendu: &str) -> bool {
    hacher_mot_de_passe(sel, mot_de_passe) == hash_attendu
}

/// Authenticated caller, extracted from the bearer token then loaded from the
/// database. Credential problems yield 401; an unreachable database yields
/// 503 instead of being disguised as an auth failure.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub utilisateur: Utilisateur,
    pub role: Role,
}

impl AuthUser {
    pub fn exiger(&self, capacite: Capacite) -> Result<(), ApiError> {
        if role_permet(self.role, capacite) {
            Ok(())
        } else {
            Err(ApiError::Autorisation("Accès refusé".to_string()))
        }
    }
}

pub fn extraire_bearer(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_string())
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extraire_bearer(parts)
            .ok_or_else(|| ApiError::Authentification("Token manquant".to_string()))?;

        let claims = decoder_token(&token, &state.config.jwt_secret)?;

        let utilisateur = Queries::get_utilisateur(state.db.pool(), claims.sub)
            .await
            .map_err(|e| {
                warn!("Base de données injoignable pendant l'authentification: {}", e);
                ApiError::Indisponible
            })?
            .ok_or_else(|| ApiError::Authentification("Token invalide".to_string()))?;

        if !utilisateur.actif {
            return Err(ApiError::Authentification("Compte désactivé".to_string()));
        }

        let role = utilisateur
            .role
            .parse::<Role>()
            .map_err(|_| ApiError::Authentification("Token invalide".to_string()))?;

        Ok(AuthUser { utilisateur, role })
    }
}
