use geo::ChamberlainDuquetteArea;
use serde::Serialize;

use crate::database::models::PointRessource;
use crate::geo::{cercle_geodesique, distance_km, Cercle};

#[derive(Debug, Clone, Serialize)]
pub struct ResultatBuffer {
    pub centre: (f64, f64),
    pub rayon_km: f64,
    pub surface_km2: f64,
    pub nb_ressources: usize,
    pub ressources: Vec<PointRessource>,
    pub polygone: geojson::Value,
}

/// Resources within `rayon_km` of the click point, with the buffer polygon
/// and its geodesic area. Membership is by great-circle distance, so growing
/// the radius can only grow the inside set.
pub fn analyser_buffer(cercle: &Cercle, points: &[PointRessource]) -> ResultatBuffer {
    let polygone = cercle_geodesique(cercle);
    let surface_km2 = polygone.chamberlain_duquette_unsigned_area() / 1_000_000.0;

    let ressources: Vec<PointRessource> = points
        .iter()
        .filter(|p| distance_km(cercle.lat, cercle.lng, p.latitude, p.longitude) <= cercle.rayon_km)
        .cloned()
        .collect();

    ResultatBuffer {
        centre: (cercle.lat, cercle.lng),
        rayon_km: cercle.rayon_km,
        surface_km2,
        nb_ressources: ressources.len(),
        ressources,
        polygone: geojson::Value::from(&polygone),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: i32, lat: f64, lng: f64) -> PointRessource {
        PointRessource {
            id,
            nom: format!("ressource-{}", id),
            latitude: lat,
            longitude: lng,
            commune_id: 1,
        }
    }

    #[test]
    fn test_toutes_les_ressources_incluses_sont_dans_le_rayon() {
        let cercle = Cercle {
            lat: 14.6928,
            lng: -17.4467,
            rayon_km: 10.0,
        };
        let points = vec![
            point(1, 14.6928, -17.4467), // au centre
            point(2, 14.7200, -17.4400), // ~3 km
            point(3, 14.7886, -16.9260), // Thiès, ~60 km
            point(4, 16.0179, -16.4896), // Saint-Louis, loin
        ];

        let resultat = analyser_buffer(&cercle, &points);
        assert_eq!(resultat.nb_ressources, 2);
        for r in &resultat.ressources {
            let d = distance_km(cercle.lat, cercle.lng, r.latitude, r.longitude);
            assert!(d <= cercle.rayon_km + 1e-9);
        }
    }

    #[test]
    fn test_monotonie_du_rayon() {
        let points: Vec<PointRessource> = (0..20)
            .map(|i| point(i, 14.5 + (i as f64) * 0.02, -16.5 + (i as f64) * 0.015))
            .collect();

        let mut precedent: Vec<i32> = vec![];
        for rayon in [1.0, 5.0, 20.0, 80.0, 300.0] {
            let cercle = Cercle {
                lat: 14.5,
                lng: -16.5,
                rayon_km: rayon,
            };
            let resultat = analyser_buffer(&cercle, &points);
            let ids: Vec<i32> = resultat.ressources.iter().map(|r| r.id).collect();
            for id in &precedent {
                assert!(ids.contains(id), "rayon {} a perdu la ressource {}", rayon, id);
            }
            precedent = ids;
        }
        assert_eq!(precedent.len(), 20);
    }

    #[test]
    fn test_surface_proche_du_disque_theorique() {
        let cercle = Cercle {
            lat: 14.0,
            lng: -16.0,
            rayon_km: 10.0,
        };
        let resultat = analyser_buffer(&cercle, &[]);
        let theorique = std::f64::consts::PI * 10.0 * 10.0;
        let ecart = (resultat.surface_km2 - theorique).abs() / theorique;
        assert!(ecart < 0.02, "surface {} km²", resultat.surface_km2);
    }
}
