use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Commune {
    pub id: i32,
    pub nom: String,
    pub region: String,
    pub departement: String,
    pub latitude: f64,
    pub longitude: f64,
    /// GeoJSON mirror of the PostGIS boundary, used by the Rust containment
    /// fallback when the spatial join is unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contour_geojson: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TypeRessource {
    pub id: i32,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub type_ressource: String,
    pub categorie: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ressource {
    pub id: i32,
    pub nom: String,
    pub type_ressource_id: i32,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub commune_id: i32,
    pub potentiel: String,
    pub etat_utilisation: String,
    pub contact_nom: Option<String>,
    pub contact_tel: Option<String>,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Utilisateur {
    pub id: i32,
    pub nom: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub commune_id: Option<i32>,
    pub actif: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditLogRow {
    pub id: i64,
    pub table_name: String,
    pub record_id: Option<String>,
    pub action: String,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
    pub user_id: Option<i32>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Minimal resource projection for the geospatial analysis paths.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PointRessource {
    pub id: i32,
    pub nom: String,
    pub latitude: f64,
    pub longitude: f64,
    pub commune_id: i32,
}

/// Qualitative valorization-potential rating of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Potentiel {
    Faible,
    Moyen,
    Eleve,
}

impl Potentiel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Potentiel::Faible => "faible",
            Potentiel::Moyen => "moyen",
            Potentiel::Eleve => "eleve",
        }
    }
}

impl FromStr for Potentiel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "faible" => Ok(Potentiel::Faible),
            "moyen" => Ok(Potentiel::Moyen),
            "eleve" => Ok(Potentiel::Eleve),
            other => Err(format!("potentiel inconnu: {}", other)),
        }
    }
}

impl fmt::Display for Potentiel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Usage state of a catalogued resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EtatUtilisation {
    #[serde(rename = "inexploite")]
    Inexploite,
    #[serde(rename = "sous-utilise")]
    SousUtilise,
    #[serde(rename = "optimise")]
    Optimise,
}

impl EtatUtilisation {
    pub fn as_str(&self) -> &'static str {
        match self {
            EtatUtilisation::Inexploite => "inexploite",
            EtatUtilisation::SousUtilise => "sous-utilise",
            EtatUtilisation::Optimise => "optimise",
        }
    }
}

impl FromStr for EtatUtilisation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inexploite" => Ok(EtatUtilisation::Inexploite),
            "sous-utilise" => Ok(EtatUtilisation::SousUtilise),
            "optimise" => Ok(EtatUtilisation::Optimise),
            other => Err(format!("état d'utilisation inconnu: {}", other)),
        }
    }
}

impl fmt::Display for EtatUtilisation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
