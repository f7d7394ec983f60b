//! Settings file load/save for `<config dir>/mira-desktop/config.json`.
//!
//! The file is a JSON object. On load its top-level keys are merged over the
//! defaults, so a partial file only overrides what it names. Keys this crate
//! does not know about are kept and written back unchanged.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::client::DEFAULT_BASE_URL;

pub const CONFIG_ENV: &str = "MIRA_CONFIG";
pub const MIN_WINDOW_WIDTH: f64 = 800.0;
pub const MIN_WINDOW_HEIGHT: f64 = 600.0;

/// Last known main-window geometry in logical pixels. Missing fields take
/// their defaults, so `{"width": 900}` is a valid value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowBounds {
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl Default for WindowBounds {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 700.0,
            x: None,
            y: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub api_base_url: String,
    pub window_bounds: WindowBounds,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.into(),
            window_bounds: WindowBounds::default(),
            extra: Map::new(),
        }
    }
}

/// Config load/save error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config root must be a JSON object")]
    NotAnObject,
    #[error("invalid config key: {0:?}")]
    InvalidKey(String),
}

impl Config {
    fn to_value(&self) -> Result<Value, ConfigError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Read a value by dot path, e.g. `windowBounds.width`.
    pub fn get_path(&self, key: &str) -> Option<Value> {
        let root = self.to_value().ok()?;
        key.split('.')
            .try_fold(&root, |node, segment| node.get(segment))
            .cloned()
    }

    /// Set a value by dot path, creating intermediate objects as needed.
    /// The config is left untouched when the key is malformed or the result
    /// no longer fits the typed fields.
    pub fn set_path(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        let segments: Vec<&str> = key.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ConfigError::InvalidKey(key.into()));
        }
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| ConfigError::InvalidKey(key.into()))?;

        let mut root = self.to_value()?;
        let mut target = &mut root;
        for segment in parents {
            let Value::Object(map) = target else {
                return Err(ConfigError::InvalidKey(key.into()));
            };
            let child = map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            target = child;
        }
        match target {
            Value::Object(map) => {
                map.insert(last.to_string(), value);
            }
            _ => return Err(ConfigError::InvalidKey(key.into())),
        }

        *self = serde_json::from_value(root)?;
        Ok(())
    }
}

/// Returns the default config file path (platform config dir).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mira-desktop").join("config.json"))
}

/// Resolve config path from an explicit override, `MIRA_CONFIG`, or the default.
pub fn resolve_path(override_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = override_path {
        return Some(p.to_path_buf());
    }
    if let Some(val) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(val));
    }
    default_config_path()
}

/// Load config from `path`. A missing file yields the defaults.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let Value::Object(overrides) = serde_json::from_str::<Value>(&contents)? else {
        return Err(ConfigError::NotAnObject);
    };

    let Value::Object(mut merged) = Config::default().to_value()? else {
        return Err(ConfigError::NotAnObject);
    };
    merged.extend(overrides);
    Ok(serde_json::from_value(Value::Object(merged))?)
}

/// Like [`load`], but logs the failure and falls back to defaults.
pub fn load_or_default(path: &Path) -> Config {
    load(path).unwrap_or_else(|e| {
        error!(path = %path.display(), error = %e, "failed to load config, using defaults");
        Config::default()
    })
}

/// Save config as pretty JSON. Creates parent directory if missing.
pub fn save(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    let contents = serde_json::to_string_pretty(config)?;
    std::fs::write(path, contents).map_err(io_err)?;
    debug!(path = %path.display(), "config saved");
    Ok(())
}
