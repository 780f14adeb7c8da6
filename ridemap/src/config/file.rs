//! INI-backed configuration file.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use thiserror::Error;

use crate::camera::{
    CameraDefaults, DEFAULT_ANIMATION_MS, DEFAULT_CAMERA_ZOOM, DEFAULT_FIT_PADDING_PX,
};
use crate::controller::{MapConfig, DEFAULT_MAP_ZOOM, DEFAULT_STYLE_URL};
use crate::relay::DEFAULT_RELAY_PORT;
use crate::rides::DEFAULT_MOCK_DELAY_MS;

/// Default API base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

/// Errors loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid INI.
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A value could not be interpreted.
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// No platform config directory could be determined.
    #[error("Could not determine configuration directory")]
    NoConfigDir,
}

/// `[map]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub style_url: String,
    pub zoom: f64,
    pub compass: bool,
    pub attribution: bool,
    pub logo: bool,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            style_url: DEFAULT_STYLE_URL.to_string(),
            zoom: DEFAULT_MAP_ZOOM,
            compass: true,
            attribution: false,
            logo: false,
        }
    }
}

/// `[camera]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSettings {
    pub zoom: f64,
    pub animation_ms: u64,
    pub fit_padding: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_CAMERA_ZOOM,
            animation_ms: DEFAULT_ANIMATION_MS,
            fit_padding: DEFAULT_FIT_PADDING_PX,
        }
    }
}

/// `[api]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSettings {
    pub base_url: String,
    pub mock_delay_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            mock_delay_ms: DEFAULT_MOCK_DELAY_MS,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `ridemap=debug`.
    pub level: String,
    /// Directory for rolling log files; `None` logs to stderr only.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

/// `[relay]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct RelaySettings {
    pub port: u16,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_RELAY_PORT,
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub map: MapSettings,
    pub camera: CameraSettings,
    pub api: ApiSettings,
    pub logging: LoggingSettings,
    pub relay: RelaySettings,
}

/// Platform configuration directory for ridemap.
pub fn config_directory() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|d| d.join("ridemap"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Path of the configuration file.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_directory()?.join("config.ini"))
}

pub(crate) fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

pub(crate) fn parse_non_negative(key: &str, value: &str) -> Result<f64, ConfigError> {
    let parsed: f64 = parse_value(key, value)?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be a non-negative number".to_string(),
        });
    }
    Ok(parsed)
}

impl ConfigFile {
    /// Load from the default path. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path()?)
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(source) => ConfigError::Io {
                path: path.to_path_buf(),
                source,
            },
            ini::Error::Parse(p) => ConfigError::Parse {
                path: path.to_path_buf(),
                message: p.to_string(),
            },
        })?;
        Self::from_ini(&ini)
    }

    /// Parse from INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<string>"),
            message: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for key in super::ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|s| s.get(key.field()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in super::ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.field(), key.get(self));
        }
        ini
    }

    /// Save to the default path, creating the directory if needed.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        self.to_ini()
            .write_to_file(path)
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Controller settings derived from `[map]` and `[camera]`.
    pub fn map_config(&self) -> MapConfig {
        MapConfig::default()
            .with_zoom(self.map.zoom)
            .with_style_url(self.map.style_url.clone())
            .with_compass(self.map.compass)
            .with_attribution(self.map.attribution)
            .with_logo(self.map.logo)
            .with_camera_defaults(CameraDefaults {
                zoom_level: self.camera.zoom,
                animation_duration_ms: self.camera.animation_ms,
                fit_padding_px: self.camera.fit_padding,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&dir.path().join("config.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_parse_partial_file() {
        let config = ConfigFile::from_ini_str(
            "[map]\nzoom = 12\nlogo = yes\n\n[camera]\nanimation_ms = 250\n",
        )
        .unwrap();
        assert_eq!(config.map.zoom, 12.0);
        assert!(config.map.logo);
        assert!(config.map.compass);
        assert_eq!(config.camera.animation_ms, 250);
        assert_eq!(config.camera.fit_padding, 50.0);
    }

    #[test]
    fn test_invalid_value_names_key() {
        let err = ConfigFile::from_ini_str("[camera]\nfit_padding = -5\n").unwrap_err();
        match err {
            ConfigError::InvalidValue { key, .. } => assert_eq!(key, "camera.fit_padding"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.map.style_url = "https://demotiles.maplibre.org/style.json".to_string();
        config.relay.port = 4000;
        config.logging.directory = Some(dir.path().join("logs"));
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_map_config_bridge() {
        let mut config = ConfigFile::default();
        config.map.zoom = 11.0;
        config.camera.animation_ms = 900;

        let map = config.map_config();
        assert_eq!(map.zoom_level, 11.0);
        assert_eq!(map.camera.animation_duration_ms, 900);
        assert_eq!(map.camera.zoom_level, 15.0);
    }
}
