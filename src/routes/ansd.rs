//! Mocked ANSD figures (national statistics agency). Static values, same
//! shape as the published census tables.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use crate::database::queries::Queries;
use crate::error::ApiError;
use crate::state::AppState;

struct Demographie {
    population: u64,
    menages: u64,
    taux_pauvrete: f64,
}

fn demographie_mock(nom: &str) -> Demographie {
    // RGPH-5 orders of magnitude; unknown communes get a plausible default.
    match nom.to_lowercase().as_str() {
        "dakar" => Demographie {
            population: 1_182_000,
            menages: 131_300,
            taux_pauvrete: 8.5,
        },
        "pikine" => Demographie {
            population: 1_170_800,
            menages: 118_900,
            taux_pauvrete: 14.2,
        },
        "touba" => Demographie {
            population: 1_133_000,
            menages: 98_500,
            taux_pauvrete: 21.3,
        },
        "thies" => Demographie {
            population: 366_000,
            menages: 40_700,
            taux_pauvrete: 26.1,
        },
        "kaolack" => Demographie {
            population: 233_700,
            menages: 25_900,
            taux_pauvrete: 38.4,
        },
        "saint-louis" => Demographie {
            population: 237_300,
            menages: 26_400,
            taux_pauvrete: 32.8,
        },
        "ziguinchor" => Demographie {
            population: 248_300,
            menages: 27_600,
            taux_pauvrete: 41.5,
        },
        _ => Demographie {
            population: 85_000,
            menages: 9_400,
            taux_pauvrete: 42.0,
        },
    }
}

pub async fn demographie(
    State(state): State<AppState>,
    Path(commune): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let commune = Queries::get_commune_par_nom(state.db.pool(), &commune)
        .await?
        .ok_or_else(|| ApiError::Introuvable("Commune introuvable".to_string()))?;

    let d = demographie_mock(&commune.nom);
    Ok(Json(json!({
        "success": true,
        "data": {
            "commune": commune.nom,
            "region": commune.region,
            "population": d.population,
            "menages": d.menages,
            "taux_pauvrete_pct": d.taux_pauvrete,
            "annee": 2023,
            "source": "ANSD (données simulées)",
        }
    })))
}

pub async fn indicateurs() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "annee": 2023,
            "indicateurs": [
                { "code": "POP", "libelle": "Population totale", "valeur": 18_032_473u64 },
                { "code": "TCA", "libelle": "Taux de croissance annuel (%)", "valeur": 2.9 },
                { "code": "PIB", "libelle": "PIB par habitant (USD)", "valeur": 1_599.0 },
                { "code": "ALPHA", "libelle": "Taux d'alphabétisation (%)", "valeur": 56.3 },
                { "code": "RUR", "libelle": "Population rurale (%)", "valeur": 51.1 },
            ],
            "source": "ANSD (données simulées)",
        }
    }))
}
