pub mod audit;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod geo;
pub mod meteo;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::AppState;
