use geo::{BooleanOps, ChamberlainDuquetteArea};
use serde::Serialize;

use crate::geo::{cercle_geodesique, Cercle};

#[derive(Debug, Clone, Serialize)]
pub struct ResultatIntersection {
    pub chevauchement: bool,
    pub surface_km2: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polygone: Option<geojson::Value>,
}

/// Set intersection of two drawn circles. Disjoint circles report
/// `chevauchement: false` and no polygon.
pub fn intersection_cercles(a: &Cercle, b: &Cercle) -> ResultatIntersection {
    let poly_a = cercle_geodesique(a);
    let poly_b = cercle_geodesique(b);

    let commun = poly_a.intersection(&poly_b);
    if commun.0.is_empty() {
        return ResultatIntersection {
            chevauchement: false,
            surface_km2: 0.0,
            polygone: None,
        };
    }

    let surface_km2 = commun.chamberlain_duquette_unsigned_area() / 1_000_000.0;
    ResultatIntersection {
        chevauchement: true,
        surface_km2,
        polygone: Some(geojson::Value::from(&commun)),
    }
}
