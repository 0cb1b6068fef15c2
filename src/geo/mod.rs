//! Geospatial zone analysis: buffers, circle intersection, density grid and
//! the zones-blanches classification.

pub mod buffer;
pub mod densite;
pub mod intersection;
pub mod zones_blanches;

use geo::{HaversineDestination, HaversineDistance, Point, Polygon};
use serde::Deserialize;

pub use buffer::{analyser_buffer, ResultatBuffer};
pub use densite::{classifier_densite, grille_densite, Bbox, CelluleDensite};
pub use intersection::{intersection_cercles, ResultatIntersection};
pub use zones_blanches::{
    classer_commune, compter_fallback, polygone_depuis_geojson, zones_depuis_comptes,
    NiveauPriorite, ZoneBlanche,
};

/// Circle request shared by the buffer and intersection tools.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Cercle {
    pub lat: f64,
    pub lng: f64,
    pub rayon_km: f64,
}

pub(crate) const SEGMENTS_CERCLE: usize = 64;

/// Geodesic circle approximated by a fixed number of haversine destinations.
pub fn cercle_geodesique(cercle: &Cercle) -> Polygon<f64> {
    let centre = Point::new(cercle.lng, cercle.lat);
    let rayon_m = cercle.rayon_km * 1000.0;

    let mut sommets = Vec::with_capacity(SEGMENTS_CERCLE + 1);
    for i in 0..SEGMENTS_CERCLE {
        let cap = 360.0 * (i as f64) / (SEGMENTS_CERCLE as f64);
        let p = centre.haversine_destination(cap, rayon_m);
        sommets.push((p.x(), p.y()));
    }
    sommets.push(sommets[0]);

    Polygon::new(sommets.into(), vec![])
}

/// Great-circle distance in kilometers.
pub fn distance_km(lat_a: f64, lng_a: f64, lat_b: f64, lng_b: f64) -> f64 {
    Point::new(lng_a, lat_a).haversine_distance(&Point::new(lng_b, lat_b)) / 1000.0
}

pub fn valider_coordonnees(lat: f64, lng: f64) -> Result<(), String> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude hors limites: {}", lat));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(format!("longitude hors limites: {}", lng));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Contains;

    #[test]
    fn test_distance_km_connue() {
        // Dakar -> Thiès, environ 60 km.
        let d = distance_km(14.6928, -17.4467, 14.7886, -16.9260);
        assert!((50.0..70.0).contains(&d), "distance inattendue: {}", d);
    }

    #[test]
    fn test_cercle_contient_son_centre() {
        let cercle = Cercle {
            lat: 14.6928,
            lng: -17.4467,
            rayon_km: 5.0,
        };
        let polygone = cercle_geodesique(&cercle);
        assert!(polygone.contains(&geo::Point::new(cercle.lng, cercle.lat)));
    }

    #[test]
    fn test_sommets_du_cercle_a_la_bonne_distance() {
        let cercle = Cercle {
            lat: 14.0,
            lng: -16.0,
            rayon_km: 10.0,
        };
        let polygone = cercle_geodesique(&cercle);
        for coord in polygone.exterior().coords() {
            let d = distance_km(cercle.lat, cercle.lng, coord.y, coord.x);
            assert!((d - 10.0).abs() < 0.05, "sommet à {} km", d);
        }
    }

    #[test]
    fn test_validation_coordonnees() {
        assert!(valider_coordonnees(14.5, -16.5).is_ok());
        assert!(valider_coordonnees(91.0, 0.0).is_err());
        assert!(valider_coordonnees(0.0, -181.0).is_err());
    }
}
