//! Control settings files for the chair line.
//!
//! A settings file mirrors the operator's sliders and switches. It can be
//! written in RON, TOML or JSON; the format is picked from the extension.

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, Format, detect_format, find_settings_file, load_settings};
pub use schema::SettingsData;
