pub mod cache;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::database::models::Commune;
use crate::error::ApiError;
use cache::TtlCache;

#[derive(Debug, Clone, Serialize)]
pub struct MeteoActuelle {
    pub commune: String,
    pub temperature_c: Option<f64>,
    pub vent_kmh: Option<f64>,
    pub code_meteo: Option<i32>,
    pub source: String,
    pub observe_a: DateTime<Utc>,
}

impl MeteoActuelle {
    /// Placeholder served when Open-Meteo cannot be reached.
    pub fn indisponible(commune: &str) -> Self {
        MeteoActuelle {
            commune: commune.to_string(),
            temperature_c: None,
            vent_kmh: None,
            code_meteo: None,
            source: "indisponible".to_string(),
            observe_a: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReponseOpenMeteo {
    current_weather: CourantOpenMeteo,
}

#[derive(Debug, Deserialize)]
struct CourantOpenMeteo {
    temperature: f64,
    windspeed: f64,
    weathercode: i32,
}

#[derive(Clone)]
pub struct MeteoService {
    client: reqwest::Client,
    base_url: String,
    cache: Arc<TtlCache<MeteoActuelle>>,
}

impl MeteoService {
    pub fn new(base_url: String, ttl: Duration) -> Self {
        MeteoService {
            client: reqwest::Client::new(),
            base_url,
            cache: Arc::new(TtlCache::new(ttl)),
        }
    }

    pub fn avec_cache(base_url: String, cache: Arc<TtlCache<MeteoActuelle>>) -> Self {
        MeteoService {
            client: reqwest::Client::new(),
            base_url,
            cache,
        }
    }

    pub async fn actuelle(&self, commune: &Commune) -> Result<MeteoActuelle, ApiError> {
        if let Some(en_cache) = self.cache.obtenir(&commune.nom) {
            debug!("Météo servie depuis le cache pour {}", commune.nom);
            return Ok(en_cache);
        }

        let url = format!(
            "{}/v1/forecast?latitude={}&longitude={}&current_weather=true",
            self.base_url, commune.latitude, commune.longitude
        );

        let reponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::ServiceExterne(format!("Open-Meteo: {}", e)))?;

        let corps: ReponseOpenMeteo = reponse
            .json()
            .await
            .map_err(|e| ApiError::ServiceExterne(format!("réponse Open-Meteo illisible: {}", e)))?;

        let meteo = MeteoActuelle {
            commune: commune.nom.clone(),
            temperature_c: Some(corps.current_weather.temperature),
            vent_kmh: Some(corps.current_weather.windspeed),
            code_meteo: Some(corps.current_weather.weathercode),
            source: "open-meteo".to_string(),
            observe_a: Utc::now(),
        };

        self.cache.inserer(commune.nom.clone(), meteo.clone());
        Ok(meteo)
    }
}
