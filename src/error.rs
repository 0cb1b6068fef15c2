use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Authentification(String),

    #[error("{0}")]
    Autorisation(String),

    #[error("{0}")]
    Introuvable(String),

    #[error("{0}")]
    Validation(String),

    #[error("Trop de tentatives, réessayez plus tard")]
    TropDeRequetes,

    #[error("Service externe indisponible: {0}")]
    ServiceExterne(String),

    #[error("Erreur interne du serveur")]
    Interne,

    #[error("Service temporairement indisponible")]
    Indisponible,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Authentification(_) => StatusCode::UNAUTHORIZED,
            ApiError::Autorisation(_) => StatusCode::FORBIDDEN,
            ApiError::Introuvable(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::TropDeRequetes => StatusCode::TOO_MANY_REQUESTS,
            ApiError::ServiceExterne(_) => StatusCode::BAD_GATEWAY,
            ApiError::Interne => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Indisponible => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

// Database error details go to the log, never into the response body.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => {
                ApiError::Introuvable("Enregistrement introuvable".to_string())
            }
            other => {
                error!("Database error: {}", other);
                ApiError::Interne
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::ServiceExterne(format!("requête échouée: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Authentification("Token invalide".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Autorisation("Accès refusé".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Introuvable("Ressource introuvable".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Validation("champ manquant".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Indisponible.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_db_error_is_not_leaked() {
        let err: ApiError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, ApiError::Interne));
        assert_eq!(err.to_string(), "Erreur interne du serveur");
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
