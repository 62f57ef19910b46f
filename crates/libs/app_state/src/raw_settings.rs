use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub api: ApiSettings,
    pub database: DatabaseSettings,
    pub secrets: SecretSettings,
    pub auth: AuthSettings,
    /// Folders where uploaded blobs are kept.
    pub uploads: RawUploadSettings,
    pub seed: SeedSettings,
    pub logging: LoggingSettings,
}

/// Configuration for the API server.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u32,
    pub allowed_origins: Vec<String>,
    /// Base url used to build public image urls, e.g. `http://localhost:8080`.
    pub public_url: String,
    pub rate_limiting: RateLimitingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitingSettings {
    pub req_per_second: u64,
    pub burst_size: u32,
}

/// Database pool configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: u64,
    pub idle_timeout: u64,
    pub acquire_timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecretSettings {
    pub jwt: String,
    pub database_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    pub access_token_expiry_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawUploadSettings {
    pub image_folder: PathBuf,
    pub cover_folder: PathBuf,
    pub max_upload_bytes: usize,
}

/// Settings for importing demo trips from OpenStreetMap.
#[derive(Debug, Deserialize, Clone)]
pub struct SeedSettings {
    pub overpass_url: String,
    pub max_trips: usize,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}
