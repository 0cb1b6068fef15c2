pub mod admin;
pub mod ansd;
pub mod assistant;
pub mod auth;
pub mod communes;
pub mod export;
pub mod geographie;
pub mod meteo;
pub mod ressources;
pub mod security;
pub mod statistiques;

use axum::extract::State;
use axum::middleware;
use axum::response::Json;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::audit::audit_middleware;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(status_endpoint))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/communes", get(communes::liste))
        .route("/api/communes/:id", get(communes::detail))
        .route("/api/types-ressources", get(communes::types_ressources))
        .route(
            "/api/ressources",
            get(ressources::liste).post(ressources::creer),
        )
        .route(
            "/api/ressources/:id",
            get(ressources::detail)
                .put(ressources::modifier)
                .delete(ressources::supprimer),
        )
        .route("/api/statistiques/dashboard", get(statistiques::dashboard))
        .route(
            "/api/statistiques/par-commune",
            get(statistiques::par_commune),
        )
        .route("/api/statistiques/par-type", get(statistiques::par_type))
        .route("/api/export/ressources.csv", get(export::ressources_csv))
        .route("/api/export/ressources.json", get(export::ressources_json))
        .route(
            "/api/export/statistiques.csv",
            get(export::statistiques_csv),
        )
        .route(
            "/api/geographie/communes/contours",
            get(geographie::contours),
        )
        .route(
            "/api/geographie/analyse/zones-blanches",
            get(geographie::zones_blanches),
        )
        .route("/api/geographie/analyse/buffer", post(geographie::buffer))
        .route(
            "/api/geographie/analyse/intersection",
            post(geographie::intersection),
        )
        .route("/api/geographie/analyse/densite", post(geographie::densite))
        .route("/api/meteo/actuelle/:commune", get(meteo::actuelle))
        .route("/api/ansd/demographie/:commune", get(ansd::demographie))
        .route("/api/ansd/indicateurs", get(ansd::indicateurs))
        .route(
            "/api/admin/utilisateurs",
            get(admin::liste_utilisateurs).post(admin::creer_utilisateur),
        )
        .route(
            "/api/admin/utilisateurs/:id",
            put(admin::modifier_utilisateur).delete(admin::supprimer_utilisateur),
        )
        .route("/api/security/audit-logs", get(security::audit_logs))
        .route(
            "/api/security/security-report",
            get(security::security_report),
        )
        .route("/api/assistant/question", post(assistant::question))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            audit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "ressources-communales",
        "timestamp": chrono::Utc::now()
    }))
}

async fn status_endpoint(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut status = serde_json::json!({
        "status": "healthy",
        "service": "ressources-communales",
        "timestamp": chrono::Utc::now(),
    });

    status["database"] = match state.db.ping().await {
        Ok(()) => serde_json::json!({ "status": "healthy" }),
        Err(_) => serde_json::json!({ "status": "error" }),
    };

    Json(status)
}
