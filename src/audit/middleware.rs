//! Request-level audit capture.
//!
//! Requests whose path matches the audited prefixes produce exactly one
//! audit event. The record id is resolved in order: numeric route segment,
//! request body `id`, response body id, then the trailing-digits fallback on
//! the raw path. Only a creation whose id is still unknown after the request
//! side rereads the response body; every other response streams through
//! untouched.

use axum::body::{to_bytes, Body};
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use regex::Regex;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::OnceLock;
use tracing::warn;

use crate::audit::event::{rediger, AuditAction, AuditEvent};
use crate::auth::decoder_token;
use crate::state::AppState;

const LIMITE_CORPS: usize = 256 * 1024;

/// Audited prefixes and the table each one maps to.
pub fn table_auditee(chemin: &str) -> Option<&'static str> {
    if chemin.starts_with("/api/ressources") {
        Some("ressources")
    } else if chemin.starts_with("/api/auth") || chemin.starts_with("/api/admin/utilisateurs") {
        Some("utilisateurs")
    } else {
        None
    }
}

pub fn deriver_action(methode: &Method, chemin: &str) -> Option<AuditAction> {
    match *methode {
        Method::POST if chemin.starts_with("/api/auth/login") => Some(AuditAction::Login),
        Method::POST if chemin.starts_with("/api/auth/logout") => Some(AuditAction::Logout),
        Method::POST => Some(AuditAction::Create),
        Method::PUT => Some(AuditAction::Update),
        Method::DELETE => Some(AuditAction::Delete),
        Method::GET => Some(AuditAction::View),
        _ => None,
    }
}

fn regex_fin_numerique() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/(\d+)(?:\?.*)?$").expect("regex invalide"))
}

/// Resolution chain: route segment, request body, response body, raw tail.
pub fn resoudre_record_id(
    chemin: &str,
    corps_requete: Option<&Value>,
    corps_reponse: Option<&Value>,
) -> Option<String> {
    if let Some(segment) = chemin.rsplit('/').next() {
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            return Some(segment.to_string());
        }
    }

    for corps in [corps_requete, corps_reponse] {
        if let Some(valeur) = corps {
            let id = valeur
                .get("id")
                .or_else(|| valeur.get("data").and_then(|d| d.get("id")));
            if let Some(id) = id {
                match id {
                    Value::Number(n) => return Some(n.to_string()),
                    Value::String(s) => return Some(s.clone()),
                    _ => {}
                }
            }
        }
    }

    regex_fin_numerique()
        .captures(chemin)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn extraire_ip(req: &Request) -> Option<String> {
    if let Some(xff) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(premier) = xff.split(',').next() {
            let premier = premier.trim();
            if !premier.is_empty() {
                return Some(premier.to_string());
            }
        }
    }
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

fn extraire_user_id(req: &Request, secret: &str) -> Option<i32> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))?;
    decoder_token(token.trim(), secret).ok().map(|c| c.sub)
}

pub async fn audit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let chemin = req.uri().path().to_string();
    let methode = req.method().clone();

    let (table, action) = match (table_auditee(&chemin), deriver_action(&methode, &chemin)) {
        (Some(table), Some(action)) => (table, action),
        _ => return next.run(req).await,
    };

    let user_id = extraire_user_id(&req, &state.config.jwt_secret);
    let ip_address = extraire_ip(&req);
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    // Mutating requests carry the payload into new_values, redacted.
    let (req, corps_requete) = if matches!(
        action,
        AuditAction::Create | AuditAction::Update | AuditAction::Login
    ) {
        let (parts, body) = req.into_parts();
        match to_bytes(body, LIMITE_CORPS).await {
            Ok(bytes) => {
                let json: Option<Value> = serde_json::from_slice(&bytes).ok();
                (Request::from_parts(parts, Body::from(bytes)), json)
            }
            Err(_) => {
                return (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    axum::Json(serde_json::json!({
                        "success": false,
                        "error": "Corps de requête trop volumineux"
                    })),
                )
                    .into_response();
            }
        }
    } else {
        (req, None)
    };

    let reponse = next.run(req).await;
    let statut = reponse.status();

    let record_id = resoudre_record_id(&chemin, corps_requete.as_ref(), None);

    // Seule une création dont l'id n'apparaît ni dans la route ni dans la
    // requête oblige à relire la réponse (une ligne JSON, jamais une liste).
    let (reponse, record_id) =
        if record_id.is_none() && action == AuditAction::Create && statut.is_success() {
            let (parts, body) = reponse.into_parts();
            match to_bytes(body, usize::MAX).await {
                Ok(bytes) => {
                    let corps_reponse: Option<Value> = serde_json::from_slice(&bytes).ok();
                    let id = resoudre_record_id(&chemin, None, corps_reponse.as_ref());
                    (Response::from_parts(parts, Body::from(bytes)), id)
                }
                Err(e) => {
                    warn!("Corps de réponse illisible, audit sans record_id: {}", e);
                    (Response::from_parts(parts, Body::empty()), None)
                }
            }
        } else {
            (reponse, record_id)
        };

    let mut new_values = corps_requete.as_ref().map(rediger);
    if action == AuditAction::Login {
        let mut objet = match new_values.take() {
            Some(Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        objet.insert("succes".to_string(), Value::Bool(statut.is_success()));
        new_values = Some(Value::Object(objet));
    }

    state.audit.enregistrer(AuditEvent {
        table_name: table.to_string(),
        record_id,
        action,
        old_values: None,
        new_values,
        user_id,
        ip_address,
        user_agent,
        created_at: Utc::now(),
    });

    reponse
}
