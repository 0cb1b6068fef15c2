use serde::{Deserialize, Serialize};

use crate::database::models::PointRessource;
use crate::geo::distance_km;

/// Hard cap on the grid so an oversized viewport cannot blow up the request.
const MAX_CELLULES: usize = 2500;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Bbox {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CelluleDensite {
    pub lat: f64,
    pub lng: f64,
    pub nb_ressources: usize,
    pub niveau: &'static str,
}

/// Color buckets used by the map overlay: 0 / 1–2 / 3–4 / ≥5.
pub fn classifier_densite(nb: usize) -> &'static str {
    match nb {
        0 => "aucune",
        1..=2 => "faible",
        3..=4 => "moyenne",
        _ => "forte",
    }
}

/// Fixed grid over the viewport. Each cell is scored by the number of
/// resources within `taille_km / 2` of its center.
pub fn grille_densite(
    bbox: &Bbox,
    taille_km: f64,
    points: &[PointRessource],
) -> Result<Vec<CelluleDensite>, String> {
    if taille_km <= 0.0 {
        return Err("taille de cellule invalide".to_string());
    }
    if bbox.max_lat <= bbox.min_lat || bbox.max_lng <= bbox.min_lng {
        return Err("emprise invalide".to_string());
    }

    let lat_mid = (bbox.min_lat + bbox.max_lat) / 2.0;
    let pas_lat = taille_km / 110.574;
    let pas_lng = taille_km / (111.320 * lat_mid.to_radians().cos().max(0.01));

    let nb_lignes = ((bbox.max_lat - bbox.min_lat) / pas_lat).ceil() as usize;
    let nb_colonnes = ((bbox.max_lng - bbox.min_lng) / pas_lng).ceil() as usize;
    if nb_lignes * nb_colonnes > MAX_CELLULES {
        return Err(format!(
            "grille trop fine: {} cellules (maximum {})",
            nb_lignes * nb_colonnes,
            MAX_CELLULES
        ));
    }

    let rayon = taille_km / 2.0;
    let mut cellules = Vec::with_capacity(nb_lignes * nb_colonnes);

    for ligne in 0..nb_lignes {
        let lat = bbox.min_lat + pas_lat * (ligne as f64 + 0.5);
        for colonne in 0..nb_colonnes {
            let lng = bbox.min_lng + pas_lng * (colonne as f64 + 0.5);
            let nb = points
                .iter()
                .filter(|p| distance_km(lat, lng, p.latitude, p.longitude) <= rayon)
                .count();
            cellules.push(CelluleDensite {
                lat,
                lng,
                nb_ressources: nb,
                niveau: classifier_densite(nb),
            });
        }
    }

    Ok(cellules)
}
