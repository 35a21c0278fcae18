use crate::config::TelemetryConfig;
use std::fmt;
use tracing::Subscriber;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "invalid log filter '{value}' (check APP_LOG_LEVEL)")
            }
            TelemetryError::Subscriber(err) => write!(f, "failed to install subscriber: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Builds the filter from `RUST_LOG` when present, falling back to the configured level.
pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(config.log_level.trim()).map_err(|source| TelemetryError::EnvFilter {
        value: config.log_level.clone(),
        source,
    })
}

/// Compact, uncoloured subscriber writing to `writer`.
pub fn subscriber<W>(
    config: &TelemetryConfig,
    writer: W,
) -> Result<impl Subscriber + Send + Sync + 'static, TelemetryError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    Ok(tracing_subscriber::fmt()
        .with_env_filter(env_filter(config)?)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .with_writer(writer)
        .finish())
}

/// Installs the global subscriber on stdout. Call once, before artifacts are loaded, so
/// capability decisions made at startup are logged.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    install(subscriber(config, std::io::stdout)?)
}

/// Like [`init`], but logs go to stderr so command output on stdout stays parseable.
pub fn init_cli(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    install(subscriber(config, std::io::stderr)?)
}

fn install(subscriber: impl Subscriber + Send + Sync + 'static) -> Result<(), TelemetryError> {
    subscriber
        .try_init()
        .map_err(|err| TelemetryError::Subscriber(Box::new(err)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_level() {
        std::env::remove_var("RUST_LOG");
        let config = TelemetryConfig {
            log_level: "haryali_ml=loud".to_string(),
        };
        let err = env_filter(&config).expect_err("filter must not parse");
        assert!(err.to_string().contains("haryali_ml=loud"));
    }

    #[test]
    fn accepts_directive_list() {
        std::env::remove_var("RUST_LOG");
        let config = TelemetryConfig {
            log_level: "info,haryali_ml=debug".to_string(),
        };
        assert!(env_filter(&config).is_ok());
    }

    #[test]
    fn startup_capability_decisions_reach_the_writer() {
        use crate::config::ArtifactConfig;
        use crate::features::PRICE_FEATURES;
        use crate::models::{ModelArtifact, ModelRegistry};
        use std::io::Write;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl Write for Captured {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().expect("capture lock").extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        std::env::remove_var("RUST_LOG");
        let dir = tempfile::tempdir().expect("temp dir");
        let price = ModelArtifact::linear(&PRICE_FEATURES, 0.0, vec![0.0; 6]);
        std::fs::write(
            dir.path().join("parali_price_model.json"),
            serde_json::to_vec(&price).expect("serialize"),
        )
        .expect("write price model");
        std::fs::write(dir.path().join("location_encoder.json"), r#"{"classes": ["Karnal"]}"#)
            .expect("write encoder");
        let mut artifacts = ArtifactConfig::in_dir(dir.path());
        artifacts.geospatial_credentials = Some(dir.path().join("absent.json"));

        let captured = Captured::default();
        let sink = captured.clone();
        let config = TelemetryConfig {
            log_level: "info".to_string(),
        };
        let subscriber = subscriber(&config, move || sink.clone()).expect("subscriber builds");

        tracing::subscriber::with_default(subscriber, || {
            ModelRegistry::load(&artifacts).expect("registry loads");
        });

        let output = String::from_utf8(captured.0.lock().expect("capture lock").clone())
            .expect("utf8 logs");
        assert!(output.contains("yield predictor not found"), "{output}");
        assert!(output.contains("geospatial credentials not found"), "{output}");
    }
}
