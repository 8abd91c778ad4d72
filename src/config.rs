use dotenvy::dotenv;
use log::error;
use serde::Deserialize;
use std::env;

const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

#[derive(Deserialize, Debug, Default, Clone)]
pub struct Config {
    pub db_path: String,
    pub http_bind_address: Option<String>,
    /// Server-side Mapbox key used for forward geocoding. When absent, the
    /// map endpoint is gated behind a per-session token submitted by the
    /// visitor.
    pub mapbox_token: Option<String>,
    pub storage_root: String,
    pub public_base_url: String,
    pub placeholder_image_url: String,
    pub featured_construction_limit: i64,
    pub session_ttl_seconds: i64,
}

pub fn create_test_config() -> Config {
    Config {
        db_path: "postgres://localhost/sviluppo_test".to_string(),
        http_bind_address: None,
        mapbox_token: Some("pk.test".to_string()),
        storage_root: "/tmp/sviluppo-storage".to_string(),
        public_base_url: "https://cdn.example.com/property-images".to_string(),
        placeholder_image_url: "https://cdn.example.com/placeholder.jpg".to_string(),
        featured_construction_limit: 6,
        session_ttl_seconds: 3600,
    }
}

pub fn read_config() -> Config {
    dotenv().ok();
    env::var(CONFIG_PATH_ENV)
        .map_err(|_| format!("{CONFIG_PATH_ENV} .env not set"))
        .and_then(|config_path| std::fs::read(config_path).map_err(|e| e.to_string()))
        .and_then(|bytes| toml::from_slice(&bytes).map_err(|e| e.to_string()))
        .unwrap_or_else(|err| {
            error!("failed to read config: {err}");
            std::process::exit(1);
        })
}
