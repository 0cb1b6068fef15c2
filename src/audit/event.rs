use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Action recorded in the audit trail, derived from the HTTP method and path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
    Logout,
    View,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
            AuditAction::Login => "LOGIN",
            AuditAction::Logout => "LOGOUT",
            AuditAction::View => "VIEW",
        }
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(AuditAction::Create),
            "UPDATE" => Ok(AuditAction::Update),
            "DELETE" => Ok(AuditAction::Delete),
            "LOGIN" => Ok(AuditAction::Login),
            "LOGOUT" => Ok(AuditAction::Logout),
            "VIEW" => Ok(AuditAction::View),
            other => Err(format!("action d'audit inconnue: {}", other)),
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub table_name: String,
    pub record_id: Option<String>,
    pub action: AuditAction,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub user_id: Option<i32>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn resume(&self) -> String {
        format!(
            "{} {} (record={})",
            self.action,
            self.table_name,
            self.record_id.as_deref().unwrap_or("-")
        )
    }
}

const CHAMPS_SENSIBLES: &[&str] = &[
    "password",
    "password_hash",
    "mot_de_passe",
    "token",
    "secret",
    "authorization",
];

/// Recursively masks sensitive fields before the event is queued for storage.
pub fn rediger(valeur: &Value) -> Value {
    match valeur {
        Value::Object(map) => {
            let mut nettoye = serde_json::Map::with_capacity(map.len());
            for (cle, v) in map {
                if CHAMPS_SENSIBLES.contains(&cle.to_lowercase().as_str()) {
                    nettoye.insert(cle.clone(), Value::String("[MASQUE]".to_string()));
                } else {
                    nettoye.insert(cle.clone(), rediger(v));
                }
            }
            Value::Object(nettoye)
        }
        Value::Array(items) => Value::Array(items.iter().map(rediger).collect()),
        autre => autre.clone(),
    }
}
