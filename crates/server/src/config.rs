use pipegallery::{ExclusionSet, RenderOptions, Trigger};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Local directory holding `config.txt` and `data/page_<N>.csv`
    #[serde(default)]
    pub site_root: Option<PathBuf>,

    /// Remote base URL serving the same layout; wins over `site_root`
    #[serde(default)]
    pub site_url: Option<String>,

    /// Append a timestamp query parameter to remote fetches
    #[serde(default = "default_true")]
    pub cache_bust: bool,

    /// Gesture revealing card details: hover, click or modifier-click
    #[serde(default)]
    pub detail_trigger: Trigger,

    /// Replaces the built-in list of attributes hidden from card details
    #[serde(default)]
    pub detail_exclusions: Option<Vec<String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            site_root: None,
            site_url: None,
            cache_bust: default_true(),
            detail_trigger: Trigger::default(),
            detail_exclusions: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, an optional `server` file and environment variables
    pub fn load() -> anyhow::Result<Self> {
        if let Err(err) = dotenvy::dotenv() {
            tracing::debug!("No .env file loaded: {err}");
        }

        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("server").required(false))
            // Override with environment variables
            .add_source(config::Environment::with_prefix("GALLERY_SERVER").separator("__"));

        let config: ServerConfig = builder.build()?.try_deserialize()?;

        if config.site_root.is_none() && config.site_url.is_none() {
            tracing::warn!("No site_root or site_url configured, serving from ./site");
        }

        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }

    /// Site directory used when no remote URL is configured
    pub fn site_root_or_default(&self) -> PathBuf {
        self.site_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("site"))
    }

    /// Rendering options derived from this configuration
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            detail_trigger: self.detail_trigger,
            exclusions: match &self.detail_exclusions {
                Some(keys) => ExclusionSet::from_keys(keys.iter().cloned()),
                None => ExclusionSet::default(),
            },
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    1
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.max_body_size(), 1024 * 1024);
        assert!(cfg.enable_cors);
        assert!(cfg.cache_bust);
        assert_eq!(cfg.detail_trigger, Trigger::Click);
        assert_eq!(cfg.site_root_or_default(), PathBuf::from("site"));
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServerConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_exclusion_override() {
        let cfg = ServerConfig {
            detail_exclusions: Some(vec!["tags".to_string()]),
            ..ServerConfig::default()
        };
        let options = cfg.render_options();
        assert!(options.exclusions.contains("tags"));
        assert!(!options.exclusions.contains("url_max"));
    }

    #[test]
    fn test_trigger_deserializes_kebab_case() {
        let cfg: ServerConfig =
            serde_json::from_str(r#"{"detail_trigger": "modifier-click"}"#).unwrap();
        assert_eq!(cfg.detail_trigger, Trigger::ModifierClick);
    }
}
