use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

const PRICE_MODEL_FILE: &str = "parali_price_model.json";
const LOCATION_ENCODER_FILE: &str = "location_encoder.json";
const YIELD_MODEL_FILE: &str = "yield_predictor.json";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub artifacts: ArtifactConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            artifacts: ArtifactConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Locations of the model artifacts loaded at startup.
///
/// The price model and location encoder are mandatory; the yield model and the
/// geospatial credentials only enable the optional yield capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactConfig {
    pub price_model: PathBuf,
    pub location_encoder: PathBuf,
    pub yield_model: PathBuf,
    pub geospatial_credentials: Option<PathBuf>,
}

impl ArtifactConfig {
    /// Default artifact layout inside a single model directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            price_model: dir.join(PRICE_MODEL_FILE),
            location_encoder: dir.join(LOCATION_ENCODER_FILE),
            yield_model: dir.join(YIELD_MODEL_FILE),
            geospatial_credentials: None,
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let dir = env::var("APP_MODEL_DIR").unwrap_or_else(|_| "models".to_string());
        if dir.trim().is_empty() {
            return Err(ConfigError::EmptyModelDir);
        }

        let mut config = Self::in_dir(dir.trim());
        if let Some(path) = path_var("APP_PRICE_MODEL_PATH") {
            config.price_model = path;
        }
        if let Some(path) = path_var("APP_LOCATION_ENCODER_PATH") {
            config.location_encoder = path;
        }
        if let Some(path) = path_var("APP_YIELD_MODEL_PATH") {
            config.yield_model = path;
        }
        config.geospatial_credentials = path_var("APP_GEOSPATIAL_CREDENTIALS");

        Ok(config)
    }
}

fn path_var(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    EmptyModelDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::EmptyModelDir => write!(f, "APP_MODEL_DIR must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::EmptyModelDir => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
