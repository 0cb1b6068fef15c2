use axum::extract::{Query, State};
use axum::Json;
use serde_json::{json, Value};

use crate::audit::AuditAction;
use crate::auth::{AuthUser, Capacite};
use crate::database::queries::{AuditFiltre, Queries};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn audit_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filtre): Query<AuditFiltre>,
) -> Result<Json<Value>, ApiError> {
    auth.exiger(Capacite::ConsulterAudit)?;

    if let Some(action) = &filtre.action {
        action
            .parse::<AuditAction>()
            .map_err(ApiError::Validation)?;
    }

    let entrees = Queries::list_audit_logs(state.db.pool(), &filtre).await?;
    Ok(Json(json!({
        "success": true,
        "data": entrees,
        "total": entrees.len(),
    })))
}

pub async fn security_report(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, ApiError> {
    auth.exiger(Capacite::ConsulterAudit)?;
    let pool = state.db.pool();

    let par_action = Queries::compte_audit_par_action(pool).await?;
    let connexions_echouees = Queries::compte_connexions_echouees(pool).await?;
    let top_utilisateurs = Queries::compte_audit_par_utilisateur(pool).await?;
    let dernieres_mutations = Queries::dernieres_mutations(pool, 20).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "genere_le": chrono::Utc::now(),
            "par_action": par_action,
            "connexions_echouees": connexions_echouees,
            "top_utilisateurs": top_utilisateurs,
            "dernieres_mutations": dernieres_mutations,
        }
    })))
}
