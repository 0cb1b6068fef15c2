//! Hand-built CSV rendering for the export endpoints.

use std::collections::HashMap;

use crate::database::models::{Commune, Ressource, TypeRessource};
use crate::database::queries::CompteParCle;

/// RFC 4180 style quoting: a field containing a comma, quote or newline is
/// wrapped in quotes with inner quotes doubled.
pub fn champ_csv(valeur: &str) -> String {
    if valeur.contains(',') || valeur.contains('"') || valeur.contains('\n') {
        format!("\"{}\"", valeur.replace('"', "\"\""))
    } else {
        valeur.to_string()
    }
}

pub fn ligne_csv(champs: &[String]) -> String {
    champs
        .iter()
        .map(|c| champ_csv(c))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn ressources_en_csv(
    ressources: &[Ressource],
    types: &[TypeRessource],
    communes: &[Commune],
) -> String {
    let noms_types: HashMap<i32, &str> = types
        .iter()
        .map(|t| (t.id, t.type_ressource.as_str()))
        .collect();
    let noms_communes: HashMap<i32, &str> =
        communes.iter().map(|c| (c.id, c.nom.as_str())).collect();

    let mut sortie = String::from(
        "id,nom,type,commune,latitude,longitude,potentiel,etat_utilisation,contact_nom,contact_tel,cree_le\n",
    );

    for r in ressources {
        let champs = vec![
            r.id.to_string(),
            r.nom.clone(),
            noms_types.get(&r.type_ressource_id).unwrap_or(&"?").to_string(),
            noms_communes.get(&r.commune_id).unwrap_or(&"?").to_string(),
            r.latitude.to_string(),
            r.longitude.to_string(),
            r.potentiel.clone(),
            r.etat_utilisation.clone(),
            r.contact_nom.clone().unwrap_or_default(),
            r.contact_tel.clone().unwrap_or_default(),
            r.created_at.to_rfc3339(),
        ];
        sortie.push_str(&ligne_csv(&champs));
        sortie.push('\n');
    }

    sortie
}

pub fn statistiques_en_csv(titre: &str, comptes: &[CompteParCle]) -> String {
    let mut sortie = format!("{},nombre\n", champ_csv(titre));
    for compte in comptes {
        sortie.push_str(&ligne_csv(&[compte.cle.clone(), compte.nb.to_string()]));
        sortie.push('\n');
    }
    sortie
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_quoting_virgule_et_guillemets() {
        assert_eq!(champ_csv("simple"), "simple");
        assert_eq!(champ_csv("a,b"), "\"a,b\"");
        assert_eq!(champ_csv("dit \"oui\""), "\"dit \"\"oui\"\"\"");
        assert_eq!(champ_csv("ligne\nsuite"), "\"ligne\nsuite\"");
    }

    #[test]
    fn test_export_ressources() {
        let types = vec![TypeRessource {
            id: 1,
            type_ressource: "point d'eau".to_string(),
            categorie: "hydraulique".to_string(),
        }];
        let communes = vec![Commune {
            id: 2,
            nom: "Fatick".to_string(),
            region: "Fatick".to_string(),
            departement: "Fatick".to_string(),
            latitude: 14.339,
            longitude: -16.4113,
            contour_geojson: None,
        }];
        let ressources = vec![Ressource {
            id: 10,
            nom: "Forage de Ndiop, secteur 2".to_string(),
            type_ressource_id: 1,
            description: None,
            latitude: 14.34,
            longitude: -16.41,
            commune_id: 2,
            potentiel: "moyen".to_string(),
            etat_utilisation: "sous-utilise".to_string(),
            contact_nom: Some("Mme Sarr".to_string()),
            contact_tel: None,
            created_by: Some(1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }];

        let csv = ressources_en_csv(&ressources, &types, &communes);
        let lignes: Vec<&str> = csv.lines().collect();
        assert_eq!(lignes.len(), 2);
        assert!(lignes[0].starts_with("id,nom,type,commune"));
        // Le nom contient une virgule, il doit être entre guillemets.
        assert!(lignes[1].contains("\"Forage de Ndiop, secteur 2\""));
        assert!(lignes[1].contains("Fatick"));
        assert!(lignes[1].contains("sous-utilise"));
    }

    #[test]
    fn test_export_statistiques() {
        let comptes = vec![
            CompteParCle {
                cle: "Dakar".to_string(),
                nb: 12,
            },
            CompteParCle {
                cle: "Podor".to_string(),
                nb: 0,
            },
        ];
        let csv = statistiques_en_csv("commune", &comptes);
        assert_eq!(csv, "commune,nombre\nDakar,12\nPodor,0\n");
    }
}
