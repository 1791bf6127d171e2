// src/config.rs
use crate::utils::jwt::JwtConfig;
use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct GeocodingConfig {
    /// Provider used first for new lookups ("Nominatim", "Photon" or "GoogleMaps")
    pub primary_provider: String,
    /// Provider tried when the primary one fails
    pub fallback_provider: Option<String>,
    pub nominatim_enabled: bool,
    pub nominatim_url: String,
    pub photon_enabled: bool,
    pub photon_url: String,
    pub google_maps_api_key: Option<String>,
    pub google_maps_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl GeocodingConfig {
    fn from_env() -> Result<Self, String> {
        let timeout_secs: u64 = env::var("GEOCODING_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| "Invalid GEOCODING_TIMEOUT_SECONDS value")?;

        Ok(Self {
            primary_provider: env::var("GEOCODING_PRIMARY_PROVIDER")
                .unwrap_or_else(|_| "Nominatim".to_string()),
            fallback_provider: env::var("GEOCODING_FALLBACK_PROVIDER")
                .ok()
                .filter(|value| !value.trim().is_empty()),
            nominatim_enabled: parse_bool_env("GEOCODING_NOMINATIM_ENABLED", true),
            nominatim_url: env::var("GEOCODING_NOMINATIM_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            photon_enabled: parse_bool_env("GEOCODING_PHOTON_ENABLED", false),
            photon_url: env::var("GEOCODING_PHOTON_URL")
                .unwrap_or_else(|_| "https://photon.komoot.io".to_string()),
            google_maps_api_key: env::var("GEOCODING_GOOGLE_MAPS_API_KEY")
                .ok()
                .filter(|value| !value.trim().is_empty()),
            google_maps_url: env::var("GEOCODING_GOOGLE_MAPS_URL")
                .unwrap_or_else(|_| "https://maps.googleapis.com".to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            user_agent: env::var("GEOCODING_USER_AGENT")
                .unwrap_or_else(|_| format!("GeoPulse/{}", env!("CARGO_PKG_VERSION"))),
        })
    }
}

#[derive(Clone, Debug)]
pub struct SharingConfig {
    pub max_links_per_user: u64,
    /// Lifetime of the token handed to a viewer after opening a share link
    pub access_token_minutes: i64,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub database_url: String,
    pub jwt: JwtConfig,
    pub geocoding: GeocodingConfig,
    pub sharing: SharingConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            environment,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| "Invalid PORT value")?,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5555".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            database_url: env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            jwt: JwtConfig::from_env().map_err(|e| e.to_string())?,
            geocoding: GeocodingConfig::from_env()?,
            sharing: SharingConfig {
                max_links_per_user: env::var("SHARING_MAX_LINKS_PER_USER")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .map_err(|_| "Invalid SHARING_MAX_LINKS_PER_USER value")?,
                access_token_minutes: env::var("SHARING_ACCESS_TOKEN_MINUTES")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .map_err(|_| "Invalid SHARING_ACCESS_TOKEN_MINUTES value")?,
            },
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Configuration used by the test suite: in-memory SQLite, no network providers.
    pub fn for_testing() -> Self {
        Self {
            environment: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_allowed_origins: vec!["http://localhost:5555".to_string()],
            database_url: "sqlite::memory:".to_string(),
            jwt: JwtConfig {
                secret_key: "test-secret-key-that-is-at-least-32-characters-long".to_string(),
                ..JwtConfig::default()
            },
            geocoding: GeocodingConfig {
                primary_provider: "Nominatim".to_string(),
                fallback_provider: None,
                nominatim_enabled: true,
                nominatim_url: "http://127.0.0.1:9".to_string(),
                photon_enabled: false,
                photon_url: "http://127.0.0.1:9".to_string(),
                google_maps_api_key: None,
                google_maps_url: "http://127.0.0.1:9".to_string(),
                request_timeout: Duration::from_secs(1),
                user_agent: "GeoPulse-Test".to_string(),
            },
            sharing: SharingConfig {
                max_links_per_user: 3,
                access_token_minutes: 30,
            },
        }
    }
}

fn parse_bool_env(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|value| match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}
