//! Typed configuration keys in `section.key` form.

use std::path::PathBuf;
use std::str::FromStr;

use super::file::{parse_bool, parse_non_negative, parse_value, ConfigError, ConfigFile};

/// Every setting in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    MapStyleUrl,
    MapZoom,
    MapCompass,
    MapAttribution,
    MapLogo,
    CameraZoom,
    CameraAnimationMs,
    CameraFitPadding,
    ApiBaseUrl,
    ApiMockDelayMs,
    LoggingLevel,
    LoggingDirectory,
    RelayPort,
}

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        use ConfigKey::*;
        &[
            MapStyleUrl,
            MapZoom,
            MapCompass,
            MapAttribution,
            MapLogo,
            CameraZoom,
            CameraAnimationMs,
            CameraFitPadding,
            ApiBaseUrl,
            ApiMockDelayMs,
            LoggingLevel,
            LoggingDirectory,
            RelayPort,
        ]
    }

    /// INI section name.
    pub fn section(&self) -> &'static str {
        use ConfigKey::*;
        match self {
            MapStyleUrl | MapZoom | MapCompass | MapAttribution | MapLogo => "map",
            CameraZoom | CameraAnimationMs | CameraFitPadding => "camera",
            ApiBaseUrl | ApiMockDelayMs => "api",
            LoggingLevel | LoggingDirectory => "logging",
            RelayPort => "relay",
        }
    }

    /// Key name within the section.
    pub fn field(&self) -> &'static str {
        use ConfigKey::*;
        match self {
            MapStyleUrl => "style_url",
            MapZoom | CameraZoom => "zoom",
            MapCompass => "compass",
            MapAttribution => "attribution",
            MapLogo => "logo",
            CameraAnimationMs => "animation_ms",
            CameraFitPadding => "fit_padding",
            ApiBaseUrl => "base_url",
            ApiMockDelayMs => "mock_delay_ms",
            LoggingLevel => "level",
            LoggingDirectory => "directory",
            RelayPort => "port",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.field())
    }

    /// Current value as a string. Unset optional values are empty.
    pub fn get(&self, config: &ConfigFile) -> String {
        use ConfigKey::*;
        match self {
            MapStyleUrl => config.map.style_url.clone(),
            MapZoom => config.map.zoom.to_string(),
            MapCompass => config.map.compass.to_string(),
            MapAttribution => config.map.attribution.to_string(),
            MapLogo => config.map.logo.to_string(),
            CameraZoom => config.camera.zoom.to_string(),
            CameraAnimationMs => config.camera.animation_ms.to_string(),
            CameraFitPadding => config.camera.fit_padding.to_string(),
            ApiBaseUrl => config.api.base_url.clone(),
            ApiMockDelayMs => config.api.mock_delay_ms.to_string(),
            LoggingLevel => config.logging.level.clone(),
            LoggingDirectory => config
                .logging
                .directory
                .as_ref()
                .map(|d| d.display().to_string())
                .unwrap_or_default(),
            RelayPort => config.relay.port.to_string(),
        }
    }

    /// Parse `value` and store it.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        use ConfigKey::*;
        let key = self.name();
        match self {
            MapStyleUrl => config.map.style_url = value.trim().to_string(),
            MapZoom => config.map.zoom = parse_non_negative(&key, value)?,
            MapCompass => config.map.compass = parse_bool(&key, value)?,
            MapAttribution => config.map.attribution = parse_bool(&key, value)?,
            MapLogo => config.map.logo = parse_bool(&key, value)?,
            CameraZoom => config.camera.zoom = parse_non_negative(&key, value)?,
            CameraAnimationMs => config.camera.animation_ms = parse_value(&key, value)?,
            CameraFitPadding => config.camera.fit_padding = parse_non_negative(&key, value)?,
            ApiBaseUrl => config.api.base_url = value.trim().trim_end_matches('/').to_string(),
            ApiMockDelayMs => config.api.mock_delay_ms = parse_value(&key, value)?,
            LoggingLevel => config.logging.level = value.trim().to_string(),
            LoggingDirectory => {
                let value = value.trim();
                config.logging.directory = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            RelayPort => config.relay.port = parse_value(&key, value)?,
        }
        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or(())
    }
}
