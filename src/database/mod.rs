pub mod models;
pub mod queries;

use sqlx::PgPool;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Database { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Database { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(include_str!("../migrations/001_initial_schema.sql"))
            .execute(&self.pool)
            .await?;

        sqlx::raw_sql(include_str!("../migrations/002_audit_logs.sql"))
            .execute(&self.pool)
            .await?;

        sqlx::raw_sql(include_str!("../migrations/003_seed.sql"))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
