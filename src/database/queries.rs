use serde::Deserialize;
use sqlx::{PgPool, QueryBuilder, Row};

use crate::database::models::*;

const COLONNES_RESSOURCE: &str = "id, nom, type_ressource_id, description, latitude, longitude, \
     commune_id, potentiel, etat_utilisation, contact_nom, contact_tel, \
     created_by, created_at, updated_at";

const COLONNES_UTILISATEUR: &str =
    "id, nom, email, password_hash, role, commune_id, actif, created_at";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RessourceFiltre {
    pub commune_id: Option<i32>,
    pub type_ressource_id: Option<i32>,
    pub potentiel: Option<String>,
    pub etat_utilisation: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RessourcePayload {
    pub nom: String,
    pub type_ressource_id: i32,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub commune_id: i32,
    pub potentiel: String,
    pub etat_utilisation: String,
    pub contact_nom: Option<String>,
    pub contact_tel: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NouvelUtilisateur {
    pub nom: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub commune_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MiseAJourUtilisateur {
    pub nom: Option<String>,
    pub role: Option<String>,
    pub commune_id: Option<i32>,
    pub actif: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditFiltre {
    pub action: Option<String>,
    pub table_name: Option<String>,
    pub user_id: Option<i32>,
    pub limit: Option<i64>,
}

/// Key/count pair produced by the aggregation queries.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct CompteParCle {
    pub cle: String,
    pub nb: i64,
}

/// Commune row annotated with its contained-resource count.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct CommuneCompteRow {
    pub id: i32,
    pub nom: String,
    pub region: String,
    pub nb_ressources: i64,
}

pub struct Queries;

impl Queries {
    // --- Communes ---

    pub async fn list_communes(pool: &PgPool) -> Result<Vec<Commune>, sqlx::Error> {
        sqlx::query_as::<_, Commune>(
            "SELECT id, nom, region, departement, latitude, longitude, contour_geojson \
             FROM communes ORDER BY nom",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn get_commune(pool: &PgPool, id: i32) -> Result<Option<Commune>, sqlx::Error> {
        sqlx::query_as::<_, Commune>(
            "SELECT id, nom, region, departement, latitude, longitude, contour_geojson \
             FROM communes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn get_commune_par_nom(
        pool: &PgPool,
        nom: &str,
    ) -> Result<Option<Commune>, sqlx::Error> {
        sqlx::query_as::<_, Commune>(
            "SELECT id, nom, region, departement, latitude, longitude, contour_geojson \
             FROM communes WHERE LOWER(nom) = LOWER($1)",
        )
        .bind(nom)
        .fetch_optional(pool)
        .await
    }

    pub async fn commune_existe(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 AS un FROM communes WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    // --- Types de ressources ---

    pub async fn list_types(pool: &PgPool) -> Result<Vec<TypeRessource>, sqlx::Error> {
        sqlx::query_as::<_, TypeRessource>(
            "SELECT id, type, categorie FROM types_ressources ORDER BY categorie, type",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn type_existe(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 AS un FROM types_ressources WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    // --- Ressources ---

    pub async fn list_ressources(
        pool: &PgPool,
        filtre: &RessourceFiltre,
    ) -> Result<Vec<Ressource>, sqlx::Error> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {} FROM ressources WHERE 1=1",
            COLONNES_RESSOURCE
        ));

        if let Some(commune_id) = filtre.commune_id {
            qb.push(" AND commune_id = ").push_bind(commune_id);
        }
        if let Some(type_id) = filtre.type_ressource_id {
            qb.push(" AND type_ressource_id = ").push_bind(type_id);
        }
        if let Some(potentiel) = &filtre.potentiel {
            qb.push(" AND potentiel = ").push_bind(potentiel.clone());
        }
        if let Some(etat) = &filtre.etat_utilisation {
            qb.push(" AND etat_utilisation = ").push_bind(etat.clone());
        }
        if let Some(q) = &filtre.q {
            let motif = format!("%{}%", q);
            qb.push(" AND (nom ILIKE ").push_bind(motif.clone());
            qb.push(" OR description ILIKE ").push_bind(motif);
            qb.push(")");
        }
        qb.push(" ORDER BY created_at DESC");

        qb.build_query_as::<Ressource>().fetch_all(pool).await
    }

    pub async fn get_ressource(pool: &PgPool, id: i32) -> Result<Option<Ressource>, sqlx::Error> {
        sqlx::query_as::<_, Ressource>(&format!(
            "SELECT {} FROM ressources WHERE id = $1",
            COLONNES_RESSOURCE
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn insert_ressource(
        pool: &PgPool,
        payload: &RessourcePayload,
        created_by: i32,
    ) -> Result<Ressource, sqlx::Error> {
        sqlx::query_as::<_, Ressource>(&format!(
            "INSERT INTO ressources \
             (nom, type_ressource_id, description, latitude, longitude, geom, \
              commune_id, potentiel, etat_utilisation, contact_nom, contact_tel, created_by) \
             VALUES ($1, $2, $3, $4, $5, ST_SetSRID(ST_MakePoint($5, $4), 4326), \
                     $6, $7, $8, $9, $10, $11) \
             RETURNING {}",
            COLONNES_RESSOURCE
        ))
        .bind(&payload.nom)
        .bind(payload.type_ressource_id)
        .bind(&payload.description)
        .bind(payload.latitude)
        .bind(payload.longitude)
        .bind(payload.commune_id)
        .bind(&payload.potentiel)
        .bind(&payload.etat_utilisation)
        .bind(&payload.contact_nom)
        .bind(&payload.contact_tel)
        .bind(created_by)
        .fetch_one(pool)
        .await
    }

    /// Full-row update, last-write-wins.
    pub async fn update_ressource(
        pool: &PgPool,
        id: i32,
        payload: &RessourcePayload,
    ) -> Result<Option<Ressource>, sqlx::Error> {
        sqlx::query_as::<_, Ressource>(&format!(
            "UPDATE ressources SET \
             nom = $1, type_ressource_id = $2, description = $3, latitude = $4, longitude = $5, \
             geom = ST_SetSRID(ST_MakePoint($5, $4), 4326), commune_id = $6, potentiel = $7, \
             etat_utilisation = $8, contact_nom = $9, contact_tel = $10, updated_at = NOW() \
             WHERE id = $11 RETURNING {}",
            COLONNES_RESSOURCE
        ))
        .bind(&payload.nom)
        .bind(payload.type_ressource_id)
        .bind(&payload.description)
        .bind(payload.latitude)
        .bind(payload.longitude)
        .bind(payload.commune_id)
        .bind(&payload.potentiel)
        .bind(&payload.etat_utilisation)
        .bind(&payload.contact_nom)
        .bind(&payload.contact_tel)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete_ressource(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ressources WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_points(pool: &PgPool) -> Result<Vec<PointRessource>, sqlx::Error> {
        sqlx::query_as::<_, PointRessource>(
            "SELECT id, nom, latitude, longitude, commune_id FROM ressources",
        )
        .fetch_all(pool)
        .await
    }

    // --- Utilisateurs ---

    pub async fn find_utilisateur_par_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Utilisateur>, sqlx::Error> {
        sqlx::query_as::<_, Utilisateur>(&format!(
            "SELECT {} FROM utilisateurs WHERE email = $1",
            COLONNES_UTILISATEUR
        ))
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    pub async fn get_utilisateur(
        pool: &PgPool,
        id: i32,
    ) -> Result<Option<Utilisateur>, sqlx::Error> {
        sqlx::query_as::<_, Utilisateur>(&format!(
            "SELECT {} FROM utilisateurs WHERE id = $1",
            COLONNES_UTILISATEUR
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list_utilisateurs(pool: &PgPool) -> Result<Vec<Utilisateur>, sqlx::Error> {
        sqlx::query_as::<_, Utilisateur>(&format!(
            "SELECT {} FROM utilisateurs ORDER BY created_at DESC",
            COLONNES_UTILISATEUR
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn insert_utilisateur(
        pool: &PgPool,
        nouvel: &NouvelUtilisateur,
        password_hash: &str,
    ) -> Result<Utilisateur, sqlx::Error> {
        sqlx::query_as::<_, Utilisateur>(&format!(
            "INSERT INTO utilisateurs (nom, email, password_hash, role, commune_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            COLONNES_UTILISATEUR
        ))
        .bind(&nouvel.nom)
        .bind(&nouvel.email)
        .bind(password_hash)
        .bind(&nouvel.role)
        .bind(nouvel.commune_id)
        .fetch_one(pool)
        .await
    }

    pub async fn update_utilisateur(
        pool: &PgPool,
        id: i32,
        maj: &MiseAJourUtilisateur,
    ) -> Result<Option<Utilisateur>, sqlx::Error> {
        sqlx::query_as::<_, Utilisateur>(&format!(
            "UPDATE utilisateurs SET \
             nom = COALESCE($1, nom), role = COALESCE($2, role), \
             commune_id = COALESCE($3, commune_id), actif = COALESCE($4, actif) \
             WHERE id = $5 RETURNING {}",
            COLONNES_UTILISATEUR
        ))
        .bind(&maj.nom)
        .bind(&maj.role)
        .bind(maj.commune_id)
        .bind(maj.actif)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Admin "delete" deactivates the account, rows are never removed.
    pub async fn desactiver_utilisateur(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE utilisateurs SET actif = FALSE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Statistiques ---

    pub async fn compte_ressources(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*)::BIGINT AS nb FROM ressources")
            .fetch_one(pool)
            .await?;
        row.try_get("nb")
    }

    pub async fn compte_par_type(pool: &PgPool) -> Result<Vec<CompteParCle>, sqlx::Error> {
        sqlx::query_as::<_, CompteParCle>(
            "SELECT t.type AS cle, COUNT(r.id)::BIGINT AS nb \
             FROM types_ressources t \
             LEFT JOIN ressources r ON r.type_ressource_id = t.id \
             GROUP BY t.type ORDER BY nb DESC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn compte_par_commune(pool: &PgPool) -> Result<Vec<CompteParCle>, sqlx::Error> {
        sqlx::query_as::<_, CompteParCle>(
            "SELECT c.nom AS cle, COUNT(r.id)::BIGINT AS nb \
             FROM communes c \
             LEFT JOIN ressources r ON r.commune_id = c.id \
             GROUP BY c.nom ORDER BY nb DESC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn compte_par_potentiel(pool: &PgPool) -> Result<Vec<CompteParCle>, sqlx::Error> {
        sqlx::query_as::<_, CompteParCle>(
            "SELECT potentiel AS cle, COUNT(*)::BIGINT AS nb \
             FROM ressources GROUP BY potentiel ORDER BY nb DESC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn compte_par_etat(pool: &PgPool) -> Result<Vec<CompteParCle>, sqlx::Error> {
        sqlx::query_as::<_, CompteParCle>(
            "SELECT etat_utilisation AS cle, COUNT(*)::BIGINT AS nb \
             FROM ressources GROUP BY etat_utilisation ORDER BY nb DESC",
        )
        .fetch_all(pool)
        .await
    }

    // --- Géographie ---

    /// Resources-per-commune via the PostGIS spatial join. Communes without a
    /// boundary polygon are excluded, the caller falls back to the Rust path.
    pub async fn compte_spatial_par_commune(
        pool: &PgPool,
    ) -> Result<Vec<CommuneCompteRow>, sqlx::Error> {
        sqlx::query_as::<_, CommuneCompteRow>(
            "SELECT c.id, c.nom, c.region, COUNT(r.id)::BIGINT AS nb_ressources \
             FROM communes c \
             LEFT JOIN ressources r ON ST_Within(r.geom, c.contour) \
             WHERE c.contour IS NOT NULL \
             GROUP BY c.id, c.nom, c.region \
             ORDER BY nb_ressources ASC, c.nom",
        )
        .fetch_all(pool)
        .await
    }

    // --- Audit ---

    pub async fn list_audit_logs(
        pool: &PgPool,
        filtre: &AuditFiltre,
    ) -> Result<Vec<AuditLogRow>, sqlx::Error> {
        let mut qb = QueryBuilder::new(
            "SELECT id, table_name, record_id, action, old_values, new_values, \
             user_id, ip_address, user_agent, created_at \
             FROM audit_logs WHERE 1=1",
        );

        if let Some(action) = &filtre.action {
            qb.push(" AND action = ").push_bind(action.clone());
        }
        if let Some(table) = &filtre.table_name {
            qb.push(" AND table_name = ").push_bind(table.clone());
        }
        if let Some(user_id) = filtre.user_id {
            qb.push(" AND user_id = ").push_bind(user_id);
        }
        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(filtre.limit.unwrap_or(100).clamp(1, 1000));

        qb.build_query_as::<AuditLogRow>().fetch_all(pool).await
    }

    pub async fn compte_audit_par_action(
        pool: &PgPool,
    ) -> Result<Vec<CompteParCle>, sqlx::Error> {
        sqlx::query_as::<_, CompteParCle>(
            "SELECT action AS cle, COUNT(*)::BIGINT AS nb \
             FROM audit_logs GROUP BY action ORDER BY nb DESC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn compte_audit_par_utilisateur(
        pool: &PgPool,
    ) -> Result<Vec<CompteParCle>, sqlx::Error> {
        sqlx::query_as::<_, CompteParCle>(
            "SELECT COALESCE(u.email, 'anonyme') AS cle, COUNT(*)::BIGINT AS nb \
             FROM audit_logs a LEFT JOIN utilisateurs u ON u.id = a.user_id \
             GROUP BY u.email ORDER BY nb DESC LIMIT 10",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn compte_connexions_echouees(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row = sqlx::query(
            "SELECT COUNT(*)::BIGINT AS nb FROM audit_logs \
             WHERE action = 'LOGIN' AND new_values->>'succes' = 'false'",
        )
        .fetch_one(pool)
        .await?;
        row.try_get("nb")
    }

    pub async fn dernieres_mutations(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<AuditLogRow>, sqlx::Error> {
        sqlx::query_as::<_, AuditLogRow>(
            "SELECT id, table_name, record_id, action, old_values, new_values, \
             user_id, ip_address, user_agent, created_at \
             FROM audit_logs WHERE action IN ('CREATE', 'UPDATE', 'DELETE') \
             ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
