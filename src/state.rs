use std::sync::Arc;

use crate::audit::AuditRecorder;
use crate::auth::rate_limit::RateLimiter;
use crate::config::AppConfig;
use crate::database::Database;
use crate::meteo::MeteoService;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: Database,
    pub audit: AuditRecorder,
    pub meteo: MeteoService,
    pub limiteur_login: Arc<RateLimiter>,
}
