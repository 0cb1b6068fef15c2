//! Closed role model and capability table.
//!
//! Permissions are an exhaustive matrix over `Role` x `Capacite` instead of
//! string comparisons scattered through the handlers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Editeur,
    Consultant,
    AgentCommunal,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editeur => "editeur",
            Role::Consultant => "consultant",
            Role::AgentCommunal => "agent_communal",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "editeur" => Ok(Role::Editeur),
            "consultant" => Ok(Role::Consultant),
            "agent_communal" => Ok(Role::AgentCommunal),
            other => Err(format!("rôle inconnu: {}", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacite {
    LireRessources,
    CreerRessource,
    ModifierSesRessources,
    ModifierToutesRessources,
    GererUtilisateurs,
    ConsulterAudit,
}

/// The full permission matrix. Every (role, capability) pair is decided here.
pub fn role_permet(role: Role, capacite: Capacite) -> bool {
    use Capacite::*;
    match (role, capacite) {
        (_, LireRessources) => true,

        (Role::Admin, CreerRessource) => true,
        (Role::Editeur, CreerRessource) => true,
        (Role::Consultant, CreerRessource) => false,
        (Role::AgentCommunal, CreerRessource) => false,

        (Role::Admin, ModifierSesRessources) => true,
        (Role::Editeur, ModifierSesRessources) => true,
        (Role::Consultant, ModifierSesRessources) => false,
        (Role::AgentCommunal, ModifierSesRessources) => false,

        (Role::Admin, ModifierToutesRessources) => true,
        (Role::Editeur, ModifierToutesRessources) => false,
        (Role::Consultant, ModifierToutesRessources) => false,
        (Role::AgentCommunal, ModifierToutesRessources) => false,

        (Role::Admin, GererUtilisateurs) => true,
        (Role::Editeur, GererUtilisateurs) => false,
        (Role::Consultant, GererUtilisateurs) => false,
        (Role::AgentCommunal, GererUtilisateurs) => false,

        (Role::Admin, ConsulterAudit) => true,
        (Role::Editeur, ConsulterAudit) => false,
        (Role::Consultant, ConsulterAudit) => false,
        (Role::AgentCommunal, ConsulterAudit) => false,
    }
}

/// Mutation rule for a resource row: admins always, editors only on rows they
/// created.
pub fn peut_modifier_ressource(role: Role, user_id: i32, created_by: Option<i32>) -> bool {
    if role_permet(role, Capacite::ModifierToutesRessources) {
        return true;
    }
    role_permet(role, Capacite::ModifierSesRessources) && created_by == Some(user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tous_les_roles_lisent() {
        for role in [
            Role::Admin,
            Role::Editeur,
            Role::Consultant,
            Role::AgentCommunal,
        ] {
            assert!(role_permet(role, Capacite::LireRessources));
        }
    }

    #[test]
    fn test_matrice_mutation() {
        // (role, est_proprietaire) -> autorisé
        let cas = [
            (Role::Admin, true, true),
            (Role::Admin, false, true),
            (Role::Editeur, true, true),
            (Role::Editeur, false, false),
            (Role::Consultant, true, false),
            (Role::Consultant, false, false),
            (Role::AgentCommunal, true, false),
            (Role::AgentCommunal, false, false),
        ];
        for (role, proprietaire, attendu) in cas {
            let created_by = if proprietaire { Some(7) } else { Some(8) };
            assert_eq!(
                peut_modifier_ressource(role, 7, created_by),
                attendu,
                "role={:?} proprietaire={}",
                role,
                proprietaire
            );
        }
    }

    #[test]
    fn test_administration_reservee_admin() {
        assert!(role_permet(Role::Admin, Capacite::GererUtilisateurs));
        assert!(role_permet(Role::Admin, Capacite::ConsulterAudit));
        for role in [Role::Editeur, Role::Consultant, Role::AgentCommunal] {
            assert!(!role_permet(role, Capacite::GererUtilisateurs));
            assert!(!role_permet(role, Capacite::ConsulterAudit));
        }
    }

    #[test]
    fn test_role_round_trip() {
        for s in ["admin", "editeur", "consultant", "agent_communal"] {
            assert_eq!(s.parse::<Role>().unwrap().as_str(), s);
        }
        assert!("superadmin".parse::<Role>().is_err());
    }
}
