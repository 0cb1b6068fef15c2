use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ressources_communales::audit::{AuditRecorder, PgAuditSink};
use ressources_communales::auth::rate_limit::RateLimiter;
use ressources_communales::config::AppConfig;
use ressources_communales::database::Database;
use ressources_communales::meteo::MeteoService;
use ressources_communales::routes;
use ressources_communales::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ressources_communales=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Démarrage du catalogue des ressources communales");

    let config = AppConfig::load()?;
    info!("Configuration chargée");

    let database = Database::new(&config.database_url).await?;
    info!("Base de données connectée");

    database.run_migrations().await?;
    info!("Migrations exécutées");

    // Audit worker: bounded queue, at-most-once writes.
    let sink = PgAuditSink::new(database.pool().clone());
    let (audit, _audit_worker) = AuditRecorder::demarrer(sink, config.audit_queue_capacity);
    info!("Journal d'audit démarré");

    let meteo = MeteoService::new(
        config.meteo_base_url.clone(),
        Duration::from_secs(config.meteo_cache_ttl_secs),
    );

    let limiteur_login = Arc::new(RateLimiter::new(
        config.login_max_tentatives,
        Duration::from_secs(config.login_fenetre_secs),
    ));

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;

    let state = AppState {
        config,
        db: database,
        audit,
        meteo,
        limiteur_login,
    };

    let app = routes::router(state).into_make_service_with_connect_info::<SocketAddr>();

    info!("Serveur à l'écoute sur {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
