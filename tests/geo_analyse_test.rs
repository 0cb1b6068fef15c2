mod common;

use common::{commune_test, point_test, points_dans_commune};
use ressources_communales::geo::{
    analyser_buffer, classer_commune, compter_fallback, distance_km, grille_densite,
    intersection_cercles, zones_depuis_comptes, Bbox, Cercle, NiveauPriorite,
};

#[test]
fn test_zones_blanches_seuils_exacts() {
    let communes = vec![
        commune_test(1, "Vide", 14.0, -16.0),
        commune_test(2, "Une", 15.0, -15.0),
        commune_test(3, "Deux", 16.0, -14.0),
        commune_test(4, "Trois", 13.0, -13.0),
        commune_test(5, "Quatre", 12.5, -12.0),
    ];

    let mut points = Vec::new();
    points.extend(points_dans_commune(&communes[1], 1));
    points.extend(points_dans_commune(&communes[2], 2));
    points.extend(points_dans_commune(&communes[3], 3));
    points.extend(points_dans_commune(&communes[4], 4));

    let comptes = compter_fallback(&communes, &points);
    let zones = zones_depuis_comptes(&comptes);

    let niveau = |nom: &str| zones.iter().find(|z| z.nom == nom).map(|z| z.niveau);
    assert_eq!(niveau("Vide"), Some("CRITIQUE"));
    assert_eq!(niveau("Une"), Some("PRIORITAIRE"));
    assert_eq!(niveau("Deux"), Some("PRIORITAIRE"));
    // Exactement trois ressources: la commune ne doit pas être signalée.
    assert_eq!(niveau("Trois"), None);
    assert_eq!(niveau("Quatre"), None);
}

#[test]
fn test_classement_est_une_partition() {
    for nb in 0..20 {
        match classer_commune(nb) {
            Some(NiveauPriorite::Critique) => assert_eq!(nb, 0),
            Some(NiveauPriorite::Prioritaire) => assert!(nb > 0 && nb < 3),
            None => assert!(nb >= 3),
        }
    }
}

#[test]
fn test_buffer_distance_et_monotonie() {
    let points: Vec<_> = (0..30)
        .map(|i| point_test(i, 14.3 + (i as f64) * 0.03, -16.8 + (i as f64) * 0.02, 1))
        .collect();

    let mut taille_precedente = 0;
    for rayon_km in [2.0, 10.0, 50.0, 200.0] {
        let cercle = Cercle {
            lat: 14.3,
            lng: -16.8,
            rayon_km,
        };
        let resultat = analyser_buffer(&cercle, &points);

        // Tout point retenu est à distance géodésique <= rayon.
        for r in &resultat.ressources {
            let d = distance_km(cercle.lat, cercle.lng, r.latitude, r.longitude);
            assert!(d <= rayon_km + 1e-9, "{} km > {} km", d, rayon_km);
        }

        // L'ensemble ne peut que croître avec le rayon.
        assert!(resultat.nb_ressources >= taille_precedente);
        taille_precedente = resultat.nb_ressources;
    }
}

#[test]
fn test_intersection_sans_chevauchement() {
    let a = Cercle {
        lat: 14.0,
        lng: -17.0,
        rayon_km: 3.0,
    };
    let b = Cercle {
        lat: 15.5,
        lng: -13.0,
        rayon_km: 3.0,
    };
    let resultat = intersection_cercles(&a, &b);
    assert!(!resultat.chevauchement);
    assert!(resultat.polygone.is_none());
}

#[test]
fn test_intersection_incluse_dans_chaque_disque() {
    let a = Cercle {
        lat: 14.5,
        lng: -16.5,
        rayon_km: 15.0,
    };
    let b = Cercle {
        lat: 14.6,
        lng: -16.4,
        rayon_km: 12.0,
    };
    let resultat = intersection_cercles(&a, &b);
    assert!(resultat.chevauchement);
    let surface_a = std::f64::consts::PI * 15.0 * 15.0;
    let surface_b = std::f64::consts::PI * 12.0 * 12.0;
    assert!(resultat.surface_km2 > 0.0);
    assert!(resultat.surface_km2 <= surface_a.min(surface_b));
}

#[test]
fn test_densite_comptage_par_cellule() {
    let bbox = Bbox {
        min_lat: 14.0,
        min_lng: -17.0,
        max_lat: 14.4,
        max_lng: -16.6,
    };
    // Trois ressources groupées au centre de l'emprise.
    let points = vec![
        point_test(1, 14.2, -16.8, 1),
        point_test(2, 14.201, -16.801, 1),
        point_test(3, 14.199, -16.799, 1),
    ];

    let cellules = grille_densite(&bbox, 10.0, &points).unwrap();
    let totale_max = cellules.iter().map(|c| c.nb_ressources).max().unwrap();
    assert!(totale_max >= 3);
    assert!(cellules
        .iter()
        .any(|c| c.nb_ressources == 3 && c.niveau == "moyenne"));
}
