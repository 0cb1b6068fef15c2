mod common;

use common::utilisateur_test;
use ressources_communales::auth::{
    decoder_token, generer_token, peut_modifier_ressource, role_permet, Capacite, Role,
};

#[test]
fn test_matrice_complete_des_permissions_de_mutation() {
    // (role, propriétaire de la ligne) -> PUT/DELETE autorisé
    let cas = [
        ("admin", true, true),
        ("admin", false, true),
        ("editeur", true, true),
        ("editeur", false, false),
        ("consultant", true, false),
        ("consultant", false, false),
        ("agent_communal", true, false),
        ("agent_communal", false, false),
    ];

    for (role_str, proprietaire, attendu) in cas {
        let role: Role = role_str.parse().unwrap();
        let id_appelant = 10;
        let created_by = if proprietaire { Some(10) } else { Some(99) };
        assert_eq!(
            peut_modifier_ressource(role, id_appelant, created_by),
            attendu,
            "role={} proprietaire={}",
            role_str,
            proprietaire
        );
    }
}

#[test]
fn test_ressource_sans_createur_reservee_admin() {
    assert!(peut_modifier_ressource(Role::Admin, 1, None));
    assert!(!peut_modifier_ressource(Role::Editeur, 1, None));
}

#[test]
fn test_creation_reservee_editeur_et_admin() {
    assert!(role_permet(Role::Admin, Capacite::CreerRessource));
    assert!(role_permet(Role::Editeur, Capacite::CreerRessource));
    assert!(!role_permet(Role::Consultant, Capacite::CreerRessource));
    assert!(!role_permet(Role::AgentCommunal, Capacite::CreerRessource));
}

#[test]
fn test_token_transporte_le_role() {
    let user = utilisateur_test(5, "agent_communal");
    let token = generer_token(&user, "secret_test", 2).unwrap();
    let claims = decoder_token(&token, "secret_test").unwrap();
    assert_eq!(claims.sub, 5);
    assert_eq!(claims.role.parse::<Role>().unwrap(), Role::AgentCommunal);
}

#[test]
fn test_token_expire_rejete() {
    let user = utilisateur_test(6, "editeur");
    // Durée négative: le token est déjà expiré.
    let token = generer_token(&user, "secret_test", -1).unwrap();
    assert!(decoder_token(&token, "secret_test").is_err());
}
