use config::{Config as ConfigLib, ConfigError, Environment, File};
use serde::Deserialize;

use crate::utils::error::{Result, ServiceError};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub node: NodeConfig,
    pub staging: StagingConfig,
    pub verifier: VerifierConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StagingConfig {
    pub directory: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifierConfig {
    pub endpoint: String,
    pub model_name: String,
    pub detector_backend: String,
    pub enforce_detection: bool,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn new() -> Result<Self> {
        let config = ConfigLib::builder()
            // Start with default values
            .set_default("node.host", "127.0.0.1")?
            .set_default("node.port", 8080)?
            .set_default("node.log_level", "info")?
            .set_default("staging.directory", "uploads")?
            .set_default("staging.max_upload_bytes", 10_485_760)? // 10MB
            .set_default("verifier.model_name", "ArcFace")?
            .set_default("verifier.detector_backend", "opencv")?
            .set_default("verifier.enforce_detection", true)?
            .set_default("verifier.request_timeout_secs", 60)?

            // Load from config file
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name("config/local").required(false))

            // Override with environment variables (e.g., APP_NODE_HOST)
            .add_source(Environment::with_prefix("APP").separator("_"))

            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.node.port == 0 {
            return Err(ServiceError::Config("Invalid port number".into()));
        }

        if self.staging.directory.is_empty() {
            return Err(ServiceError::Config("staging directory must be set".into()));
        }
        if self.staging.max_upload_bytes == 0 {
            return Err(ServiceError::Config("max_upload_bytes must be greater than 0".into()));
        }

        if self.verifier.endpoint.is_empty() {
            return Err(ServiceError::Config("verifier endpoint must be set".into()));
        }
        if !self.verifier.endpoint.starts_with("http://") && !self.verifier.endpoint.starts_with("https://") {
            return Err(ServiceError::Config("verifier endpoint must be an http(s) URL".into()));
        }
        if self.verifier.model_name.is_empty() {
            return Err(ServiceError::Config("verifier model_name must be set".into()));
        }
        if self.verifier.detector_backend.is_empty() {
            return Err(ServiceError::Config("verifier detector_backend must be set".into()));
        }
        if self.verifier.request_timeout_secs == 0 {
            return Err(ServiceError::Config("request_timeout_secs must be greater than 0".into()));
        }

        Ok(())
    }
}

impl From<ConfigError> for ServiceError {
    fn from(error: ConfigError) -> Self {
        ServiceError::Config(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        Config {
            node: NodeConfig {
                host: "127.0.0.1".into(),
                port: 8080,
                log_level: "info".into(),
            },
            staging: StagingConfig {
                directory: "uploads".into(),
                max_upload_bytes: 10_485_760,
            },
            verifier: VerifierConfig {
                endpoint: "http://localhost:5000".into(),
                model_name: "ArcFace".into(),
                detector_backend: "opencv".into(),
                enforce_detection: true,
                request_timeout_secs: 60,
            },
        }
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn rejects_zero_port() {
        let mut config = sample_config();
        config.node.port = 0;
        assert!(matches!(config.validate(), Err(ServiceError::Config(_))));
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let mut config = sample_config();
        config.verifier.endpoint = "localhost:5000".into();
        assert!(matches!(config.validate(), Err(ServiceError::Config(_))));
    }

    #[test]
    fn rejects_zero_upload_limit() {
        let mut config = sample_config();
        config.staging.max_upload_bytes = 0;
        assert!(matches!(config.validate(), Err(ServiceError::Config(_))));
    }
}
