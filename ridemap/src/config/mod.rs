//! Configuration file handling.
//!
//! Settings live in an INI file at `<config_dir>/ridemap/config.ini`. A
//! missing file means defaults; unknown keys are ignored; values that fail to
//! parse are reported with their `section.key`.
//!
//! ```ini
//! [map]
//! style_url = mapbox://styles/mapbox/streets-v12
//! zoom = 14
//! compass = true
//!
//! [camera]
//! zoom = 15
//! animation_ms = 500
//! fit_padding = 50
//! ```

mod file;
mod keys;

pub use file::{
    config_directory, config_file_path, ApiSettings, CameraSettings, ConfigError, ConfigFile,
    LoggingSettings, MapSettings, RelaySettings,
};
pub use keys::ConfigKey;
