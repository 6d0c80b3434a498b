//! Layered configuration.
//!
//! Sources, later ones winning:
//! - Built-in defaults
//! - `.typeindex/settings.toml`, found by walking up from the current directory
//! - Environment variables
//!
//! # Environment Variables
//!
//! Variables are prefixed with `TI_` and use double underscores to separate
//! nested levels:
//! - `TI_INDEX_PATH=build/elements.idx` sets `index_path`
//! - `TI_COLLECTOR__MAX_TAG_DEPTH=16` sets `collector.max_tag_depth`
//! - `TI_LOGGING__DEFAULT=debug` sets `logging.default`

use crate::indexing::SeedConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".typeindex";
const CONFIG_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "TI_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Index file written by every pass
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// Id of the index service used to read and write the index
    #[serde(default = "default_service")]
    pub service: String,

    #[serde(default)]
    pub markers: MarkersConfig,

    #[serde(default)]
    pub collector: CollectorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MarkersConfig {
    /// Directory holding one snapshot file per pass
    #[serde(default = "default_markers_dir")]
    pub directory: PathBuf,

    /// Snapshot file extension, without the dot
    #[serde(default = "default_markers_extension")]
    pub extension: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CollectorConfig {
    /// Tag every pass starts from; never persisted as a marker
    #[serde(default = "default_bootstrap_tag")]
    pub bootstrap_tag: String,

    /// Maximum levels of nested tag declarations; one more level fails the pass
    #[serde(default = "default_max_tag_depth")]
    pub max_tag_depth: usize,

    /// Optional seed file in the `#annotations` / `#interfaces` / ... format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<PathBuf>,

    #[serde(default)]
    pub annotations: Vec<String>,

    #[serde(default)]
    pub interfaces: Vec<String>,

    #[serde(default)]
    pub classes: Vec<String>,

    /// Element id to aliases
    #[serde(default)]
    pub aliases: BTreeMap<String, Vec<String>>,
}

impl CollectorConfig {
    /// Seeds declared inline in the settings.
    pub fn inline_seeds(&self) -> SeedConfig {
        SeedConfig {
            annotations: self.annotations.iter().cloned().collect(),
            interfaces: self.interfaces.iter().cloned().collect(),
            classes: self.classes.iter().cloned().collect(),
            aliases: self
                .aliases
                .iter()
                .map(|(id, names)| (id.clone(), names.iter().cloned().collect()))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level: error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target overrides, e.g. `typeindex::indexing = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_version() -> u32 {
    1
}
fn default_index_path() -> PathBuf {
    PathBuf::from(".typeindex/index/elements.idx")
}
fn default_service() -> String {
    crate::storage::DEFAULT_SERVICE.to_string()
}
fn default_markers_dir() -> PathBuf {
    PathBuf::from(".typeindex/markers")
}
fn default_markers_extension() -> String {
    "markers".to_string()
}
fn default_bootstrap_tag() -> String {
    "io.typeindex.Indexed".to_string()
}
fn default_max_tag_depth() -> usize {
    64
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            index_path: default_index_path(),
            service: default_service(),
            markers: MarkersConfig::default(),
            collector: CollectorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            directory: default_markers_dir(),
            extension: default_markers_extension(),
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            bootstrap_tag: default_bootstrap_tag(),
            max_tag_depth: default_max_tag_depth(),
            seed_file: None,
            annotations: Vec::new(),
            interfaces: Vec::new(),
            classes: Vec::new(),
            aliases: BTreeMap::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// Load configuration from a specific file, still honouring the environment
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(path.as_ref().to_path_buf())
            .extract()
            .map_err(Box::new)
    }

    fn figment(config_path: PathBuf) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            // Double underscore separates nested levels; single underscores
            // stay part of the field name.
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
    }

    /// Find `.typeindex/settings.toml` in the current directory or an ancestor
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .map(|ancestor| ancestor.join(CONFIG_DIR))
            .find(|dir| dir.is_dir())
            .map(|dir| dir.join(CONFIG_FILE))
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }
}
