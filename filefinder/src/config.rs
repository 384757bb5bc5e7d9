use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::search::ServiceLimits;

const DEFAULT_WORKER_COUNT: usize = 10;

/// Configuration for a combined search.
///
/// # Configuration Locations
///
/// Loaded from these locations, later ones taking precedence:
/// 1. Global `$HOME/.config/filefinder/config.yaml`
/// 2. Local `.filefinder.yaml` in the current directory
/// 3. Custom config file specified via `--config` flag
///
/// # Configuration Format
///
/// ```yaml
/// # Substring of the file names to find
/// name: "report"
///
/// # Substring of a line inside the files to find
/// content: "quarterly"
///
/// # Directory whose files and immediate subdirectories are searched
/// root_path: "."
///
/// # Size of the subdirectory worker pool
/// worker_count: 10
///
/// # Give up waiting for subdirectory tasks after this long
/// search_timeout: "30s"
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "warn"
///
/// # Bounds applied by the filesystem search service
/// limits:
///   max_matches: 10
/// ```
///
/// Command-line arguments take precedence over file values, see
/// [`FinderConfig::merge_with_cli`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinderConfig {
    /// Name substring to search for; empty disables name search
    #[serde(default)]
    pub name: String,

    /// Content substring to search for; empty disables content search
    #[serde(default)]
    pub content: String,

    /// Root directory to start search from
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Number of worker threads for subdirectory tasks
    #[serde(default = "default_worker_count")]
    pub worker_count: NonZeroUsize,

    /// Upper bound on the wait for subdirectory tasks, e.g. "500ms" or "1m"
    #[serde(default, with = "humantime_opt")]
    pub search_timeout: Option<Duration>,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Overrides for the filesystem service limits
    #[serde(default)]
    pub limits: ServiceLimits,
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

pub(crate) fn default_worker_count() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_WORKER_COUNT).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            content: String::new(),
            root_path: default_root_path(),
            worker_count: default_worker_count(),
            search_timeout: None,
            log_level: default_log_level(),
            limits: ServiceLimits::default(),
        }
    }
}

impl FinderConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from the default locations plus a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
        }

        let mut builder = ConfigBuilder::builder();

        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("filefinder/config.yaml")),
            // Local config
            Some(PathBuf::from(".filefinder.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli_config: FinderConfig) -> Self {
        // CLI values take precedence over config file values
        if !cli_config.name.is_empty() {
            self.name = cli_config.name;
        }
        if !cli_config.content.is_empty() {
            self.content = cli_config.content;
        }
        if cli_config.root_path != default_root_path() {
            self.root_path = cli_config.root_path;
        }
        if cli_config.worker_count != default_worker_count() {
            self.worker_count = cli_config.worker_count;
        }
        if cli_config.search_timeout.is_some() {
            self.search_timeout = cli_config.search_timeout;
        }
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }
}

mod humantime_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&humantime::format_duration(*d).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|s| humantime::parse_duration(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
