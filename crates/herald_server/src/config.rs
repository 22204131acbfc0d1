//! Service configuration.
//!
//! Sources, lowest precedence first:
//! - Bundled defaults (include_str! from herald.toml)
//! - `~/.config/herald/herald.toml`
//! - `./herald.toml`
//! - `HERALD__<SECTION>__<KEY>` environment variables

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use derive_getters::Getters;
use herald_cache::CacheConfig;
use herald_core::FetchWindow;
use herald_error::{ConfigError, HeraldResult};
use herald_rate_limit::GatewayConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../herald.toml");

/// Complete service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct HeraldConfig {
    /// HTTP listener and logging
    server: ServerSection,
    /// Gateway connection
    api: GatewayConfig,
    /// Channel to mirror and how to page through it
    channel: ChannelSection,
    /// Cache policy and persistence
    cache: CacheSection,
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ServerSection {
    /// Listen address, e.g. `0.0.0.0:3000`
    bind: String,
    /// Log filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    log_level: String,
    /// Emit JSON log lines
    #[serde(default)]
    json_logs: bool,
    /// Allowed CORS origins; any origin when empty
    #[serde(default)]
    cors_origins: Vec<String>,
    /// Distinct visitor ids remembered before counting stops
    #[serde(default = "default_max_visitors")]
    max_visitors: usize,
}

fn default_max_visitors() -> usize {
    crate::DEFAULT_VISITOR_LIMIT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ServerSection {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|e| ConfigError::new(format!("Invalid bind address '{}': {}", self.bind, e)))
    }
}

/// `[channel]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChannelSection {
    /// Public username of the channel
    username: String,
    /// Messages requested per page
    page_size: u32,
    /// Offset at which pagination stops (exclusive)
    max_offset: u32,
    /// Pause between consecutive pages, in milliseconds
    #[serde(default = "default_page_delay_ms")]
    page_delay_ms: u64,
}

fn default_page_delay_ms() -> u64 {
    2000
}

impl ChannelSection {
    /// Pagination window described by this section.
    pub fn window(&self) -> Result<FetchWindow, ConfigError> {
        FetchWindow::new(self.page_size, self.max_offset)
    }

    /// Pause between consecutive pages.
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct CacheSection {
    /// Snapshot time-to-live in seconds
    ttl_secs: u64,
    /// Minimum seconds between refresh attempts
    min_refresh_interval_secs: u64,
    /// Where the snapshot is persisted
    path: PathBuf,
    /// Fetch before serving when nothing was persisted
    #[serde(default)]
    warm_on_start: bool,
}

impl CacheSection {
    /// Cache timing policy.
    pub fn policy(&self) -> CacheConfig {
        CacheConfig::new(
            Duration::from_secs(self.ttl_secs),
            Duration::from_secs(self.min_refresh_interval_secs),
        )
    }
}

impl HeraldConfig {
    /// Load configuration from every source.
    ///
    /// # Errors
    ///
    /// Fails if a source cannot be parsed or a value is out of range.
    #[instrument]
    pub fn load() -> HeraldResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder = Self::defaults();

        if let Some(config_dir) = dirs::config_dir() {
            let home_config = config_dir.join("herald/herald.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("herald").required(false))
            .add_source(
                Environment::with_prefix("HERALD")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            );

        Self::finish(builder)
    }

    /// Bundled defaults overridden by one TOML file.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or invalid.
    pub fn from_file(path: impl AsRef<Path>) -> HeraldResult<Self> {
        Self::finish(Self::defaults().add_source(File::from(path.as_ref())))
    }

    /// Bundled defaults overridden by TOML text.
    ///
    /// # Errors
    ///
    /// Fails if the text is invalid or a value is out of range.
    pub fn from_toml_str(toml: &str) -> HeraldResult<Self> {
        Self::finish(Self::defaults().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    /// Check values that deserialization cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.bind_addr()?;
        self.channel.window()?;
        if self.channel.username.trim().is_empty() {
            return Err(ConfigError::new("channel.username must not be empty"));
        }
        Ok(())
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> HeraldResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}
