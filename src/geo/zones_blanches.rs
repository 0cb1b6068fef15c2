//! Under-served commune detection.
//!
//! A commune with no catalogued resource is CRITIQUE, fewer than three is
//! PRIORITAIRE, three or more is not flagged. Counting normally happens in
//! PostGIS (`ST_Within` join); when that path is unavailable the counts are
//! recomputed here from the GeoJSON contours.

use geo::{Contains, Point, Polygon};
use serde::Serialize;

use crate::database::models::{Commune, PointRessource};
use crate::database::queries::CommuneCompteRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NiveauPriorite {
    Critique,
    Prioritaire,
}

impl NiveauPriorite {
    pub fn as_str(&self) -> &'static str {
        match self {
            NiveauPriorite::Critique => "CRITIQUE",
            NiveauPriorite::Prioritaire => "PRIORITAIRE",
        }
    }
}

/// Flagging rule. The boundary at three resources is deliberately unflagged.
pub fn classer_commune(nb_ressources: i64) -> Option<NiveauPriorite> {
    match nb_ressources {
        0 => Some(NiveauPriorite::Critique),
        1 | 2 => Some(NiveauPriorite::Prioritaire),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneBlanche {
    pub commune_id: i32,
    pub nom: String,
    pub region: String,
    pub nb_ressources: i64,
    pub niveau: &'static str,
}

pub fn zones_depuis_comptes(comptes: &[CommuneCompteRow]) -> Vec<ZoneBlanche> {
    comptes
        .iter()
        .filter_map(|row| {
            classer_commune(row.nb_ressources).map(|niveau| ZoneBlanche {
                commune_id: row.id,
                nom: row.nom.clone(),
                region: row.region.clone(),
                nb_ressources: row.nb_ressources,
                niveau: niveau.as_str(),
            })
        })
        .collect()
}

pub fn polygone_depuis_geojson(texte: &str) -> Option<Polygon<f64>> {
    let geometrie: geojson::Geometry = serde_json::from_str(texte).ok()?;
    match geo::Geometry::<f64>::try_from(geometrie.value).ok()? {
        geo::Geometry::Polygon(polygone) => Some(polygone),
        geo::Geometry::MultiPolygon(multi) => multi.0.into_iter().next(),
        _ => None,
    }
}

/// Pure-Rust fallback: point-in-polygon containment per commune contour.
/// Communes without a contour are skipped, matching the SQL path.
pub fn compter_fallback(
    communes: &[Commune],
    points: &[PointRessource],
) -> Vec<CommuneCompteRow> {
    let mut comptes = Vec::new();

    for commune in communes {
        let Some(texte) = commune.contour_geojson.as_deref() else {
            continue;
        };
        let Some(polygone) = polygone_depuis_geojson(texte) else {
            continue;
        };

        let nb = points
            .iter()
            .filter(|p| polygone.contains(&Point::new(p.longitude, p.latitude)))
            .count() as i64;

        comptes.push(CommuneCompteRow {
            id: commune.id,
            nom: commune.nom.clone(),
            region: commune.region.clone(),
            nb_ressources: nb,
        });
    }

    comptes.sort_by(|a, b| a.nb_ressources.cmp(&b.nb_ressources).then(a.nom.cmp(&b.nom)));
    comptes
}
