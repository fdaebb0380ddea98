use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::middleware::DEFAULT_MAX_BODY_BYTES;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.yaml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub request_log: RequestLogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub format: LogFormat,
    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    pub filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestLogConfig {
    pub enabled: bool,
    /// Header carrying the original client address when running behind a proxy.
    pub client_ip_header: Option<String>,
    /// Request bodies up to this size are rendered as the last argument.
    pub max_body_bytes: usize,
}

impl Default for RequestLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            client_ip_header: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(&config_path).required(false))
            .add_source(config::Environment::with_prefix("REQLOG").separator("__"));

        // Override with environment variables if present
        if let Ok(host) = std::env::var("HOST") {
            builder = builder.set_override("server.host", host)?;
        }
        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port.parse::<u16>()?)?;
        }

        let settings = builder.build()?;
        let config: AppConfig = settings.try_deserialize()?;
        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Yaml))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_sections() {
        let config = AppConfig::from_yaml("server:\n  port: 8081\n").unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.telemetry.format, LogFormat::Pretty);
        assert!(config.request_log.enabled);
        assert!(config.request_log.client_ip_header.is_none());
        assert_eq!(config.request_log.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn parses_full_document() {
        let yaml = r#"
server:
  host: 127.0.0.1
  port: 9000
  timeout_seconds: 5
telemetry:
  format: json
  filter: "request_log_gateway=debug"
request_log:
  enabled: false
  client_ip_header: x-forwarded-for
  max_body_bytes: 512
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.timeout_seconds, 5);
        assert_eq!(config.telemetry.format, LogFormat::Json);
        assert_eq!(config.telemetry.filter, "request_log_gateway=debug");
        assert!(!config.request_log.enabled);
        assert_eq!(
            config.request_log.client_ip_header.as_deref(),
            Some("x-forwarded-for")
        );
        assert_eq!(config.request_log.max_body_bytes, 512);
    }

    #[test]
    fn rejects_unknown_log_format() {
        assert!(AppConfig::from_yaml("telemetry:\n  format: xml\n").is_err());
    }
}
