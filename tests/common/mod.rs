use chrono::Utc;
use ressources_communales::database::models::{Commune, PointRessource, Utilisateur};

/// Square commune of roughly 22 km per side centered on (lat, lng).
pub fn commune_test(id: i32, nom: &str, lat: f64, lng: f64) -> Commune {
    let d = 0.1;
    let contour = format!(
        r#"{{"type":"Polygon","coordinates":[[[{x0},{y0}],[{x1},{y0}],[{x1},{y1}],[{x0},{y1}],[{x0},{y0}]]]}}"#,
        x0 = lng - d,
        x1 = lng + d,
        y0 = lat - d,
        y1 = lat + d
    );
    Commune {
        id,
        nom: nom.to_string(),
        region: "Test".to_string(),
        departement: "Test".to_string(),
        latitude: lat,
        longitude: lng,
        contour_geojson: Some(contour),
    }
}

pub fn point_test(id: i32, lat: f64, lng: f64, commune_id: i32) -> PointRessource {
    PointRessource {
        id,
        nom: format!("ressource-{}", id),
        latitude: lat,
        longitude: lng,
        commune_id,
    }
}

pub fn utilisateur_test(id: i32, role: &str) -> Utilisateur {
    Utilisateur {
        id,
        nom: format!("Utilisateur {}", id),
        email: format!("u{}@commune.sn", id),
        password_hash: String::new(),
        role: role.to_string(),
        commune_id: Some(1),
        actif: true,
        created_at: Utc::now(),
    }
}

/// `n` points scattered inside the square contour of `commune_test`.
pub fn points_dans_commune(commune: &Commune, n: usize) -> Vec<PointRessource> {
    (0..n)
        .map(|i| {
            let decalage = 0.01 + (i as f64) * 0.005;
            point_test(
                (commune.id * 100) + i as i32,
                commune.latitude + decalage,
                commune.longitude - decalage,
                commune.id,
            )
        })
        .collect()
}
