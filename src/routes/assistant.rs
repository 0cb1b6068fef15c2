//! Local rule-based assistant. Answers a handful of catalogue questions from
//! the database, no external model involved.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::queries::Queries;
use crate::error::ApiError;
use crate::geo::zones_depuis_comptes;
use crate::routes::geographie::comptes_par_commune_avec_repli;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuestionPayload {
    pub question: String,
}

pub async fn question(
    State(state): State<AppState>,
    Json(payload): Json<QuestionPayload>,
) -> Result<Json<Value>, ApiError> {
    let question = payload.question.to_lowercase();
    let pool = state.db.pool();

    let reponse = if question.contains("zone") && question.contains("blanche") {
        let (comptes, _) = comptes_par_commune_avec_repli(pool).await?;
        let zones = zones_depuis_comptes(&comptes);
        format!(
            "{} commune(s) sont actuellement sous-équipées (moins de 3 ressources cataloguées). \
             Consultez /api/geographie/analyse/zones-blanches pour le détail.",
            zones.len()
        )
    } else if question.contains("combien") && question.contains("ressource") {
        let total = Queries::compte_ressources(pool).await?;
        format!("Le catalogue compte {} ressource(s) géolocalisée(s).", total)
    } else if question.contains("potentiel") {
        let comptes = Queries::compte_par_potentiel(pool).await?;
        let detail: Vec<String> = comptes
            .iter()
            .map(|c| format!("{}: {}", c.cle, c.nb))
            .collect();
        format!("Répartition par potentiel — {}.", detail.join(", "))
    } else if question.contains("commune") {
        let comptes = Queries::compte_par_commune(pool).await?;
        match comptes.first() {
            Some(premier) => format!(
                "La commune la mieux dotée est {} avec {} ressource(s).",
                premier.cle, premier.nb
            ),
            None => "Aucune commune enregistrée pour le moment.".to_string(),
        }
    } else {
        "Je peux répondre sur le nombre de ressources, la répartition par potentiel, \
         les communes et les zones blanches. Reformulez votre question."
            .to_string()
    };

    Ok(Json(json!({
        "success": true,
        "data": {
            "reponse": reponse,
            "source": "locale",
        }
    })))
}
