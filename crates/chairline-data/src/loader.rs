//! Settings loading: format detection, file discovery and deserialization
//! into [`ControlSettings`].

use chairline_core::config::{ControlSettings, QualityLevel, Shop};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::schema::SettingsData;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading a settings file.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A field parsed but holds a value the line cannot use.
    #[error("invalid value for '{field}' in {file}: {detail}")]
    InvalidValue {
        file: PathBuf,
        field: &'static str,
        detail: String,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a settings file with the given base name.
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// more than one format exists.
pub fn find_settings_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Read a file and deserialize it according to its format.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    let parse_err = |detail: String| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    };

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_err(e.to_string())),
    }
}

// ===========================================================================
// Settings
// ===========================================================================

/// Load a settings file into engine controls.
///
/// Missing fields keep their defaults. Numbers go through the same setters
/// the live sliders use, so a negative raw rate reads as zero and a
/// non-finite one keeps the default. A quality level outside 1..=3 is an
/// error here rather than being ignored.
pub fn load_settings(path: &Path) -> Result<ControlSettings, DataLoadError> {
    debug!(file = %path.display(), "loading settings");
    let data: SettingsData = deserialize_file(path)?;
    resolve_settings(&data, path)
}

/// Turn parsed settings into engine controls. `file` is used for errors.
pub fn resolve_settings(data: &SettingsData, file: &Path) -> Result<ControlSettings, DataLoadError> {
    let quality =
        QualityLevel::from_level(data.quality_level).ok_or_else(|| DataLoadError::InvalidValue {
            file: file.to_path_buf(),
            field: "quality_level",
            detail: format!("expected 1, 2 or 3, got {}", data.quality_level),
        })?;
    let mut settings = ControlSettings::default();
    settings.set_raw_material_rate(data.raw_material_rate);
    settings.set_shop_speed(Shop::Metal, data.metal_shop_speed);
    settings.set_shop_speed(Shop::Wood, data.wood_shop_speed);
    settings.set_shop_speed(Shop::Assembly, data.assembly_speed);
    settings.set_quality(quality);
    settings.set_maintenance_mode(data.maintenance_mode);
    Ok(settings)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chairline_core::fixed::Fixed64;
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "chairline_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Clean up a test directory.
    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    // -----------------------------------------------------------------------
    // detect_format
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("line.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("line.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("line.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_unsupported() {
        for name in ["line.yaml", "line"] {
            assert!(matches!(
                detect_format(Path::new(name)),
                Err(DataLoadError::UnsupportedFormat { .. })
            ));
        }
    }

    // -----------------------------------------------------------------------
    // find_settings_file
    // -----------------------------------------------------------------------

    #[test]
    fn find_settings_file_found() {
        let dir = make_test_dir("find_found");
        fs::write(dir.join("line.toml"), "").unwrap();

        let found = find_settings_file(&dir, "line").unwrap();
        assert_eq!(found, Some(dir.join("line.toml")));

        cleanup(&dir);
    }

    #[test]
    fn find_settings_file_missing() {
        let dir = make_test_dir("find_missing");
        assert!(find_settings_file(&dir, "line").unwrap().is_none());
        cleanup(&dir);
    }

    #[test]
    fn find_settings_file_conflict() {
        let dir = make_test_dir("find_conflict");
        fs::write(dir.join("line.ron"), "()").unwrap();
        fs::write(dir.join("line.json"), "{}").unwrap();

        let result = find_settings_file(&dir, "line");
        assert!(matches!(
            result,
            Err(DataLoadError::ConflictingFormats { .. })
        ));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // load_settings
    // -----------------------------------------------------------------------

    #[test]
    fn load_settings_ron() {
        let dir = make_test_dir("load_ron");
        let path = dir.join("line.ron");
        fs::write(
            &path,
            "(raw_material_rate: 8.0, metal_shop_speed: 150, quality_level: 3)",
        )
        .unwrap();

        let s = load_settings(&path).unwrap();
        assert_eq!(s.raw_material_rate(), Fixed64::from_num(8));
        assert_eq!(s.shop_speed(Shop::Metal), 150);
        assert_eq!(s.shop_speed(Shop::Wood), 100);
        assert_eq!(s.quality(), QualityLevel::Premium);

        cleanup(&dir);
    }

    #[test]
    fn load_settings_toml() {
        let dir = make_test_dir("load_toml");
        let path = dir.join("line.toml");
        fs::write(
            &path,
            r#"
raw_material_rate = 12.5
wood_shop_speed = 60
maintenance_mode = true
"#,
        )
        .unwrap();

        let s = load_settings(&path).unwrap();
        assert_eq!(s.raw_material_rate(), Fixed64::from_num(12.5));
        assert_eq!(s.shop_speed(Shop::Wood), 60);
        assert!(s.maintenance_mode());
        assert_eq!(s.quality(), QualityLevel::Standard);

        cleanup(&dir);
    }

    #[test]
    fn load_settings_json() {
        let dir = make_test_dir("load_json");
        let path = dir.join("line.json");
        fs::write(&path, r#"{ "assembly_speed": 200, "quality_level": 1 }"#).unwrap();

        let s = load_settings(&path).unwrap();
        assert_eq!(s.shop_speed(Shop::Assembly), 200);
        assert_eq!(s.quality(), QualityLevel::Fast);
        assert_eq!(s.raw_material_rate(), Fixed64::from_num(5));

        cleanup(&dir);
    }

    #[test]
    fn negative_rate_reads_as_zero() {
        let dir = make_test_dir("load_negative");
        let path = dir.join("line.json");
        fs::write(&path, r#"{ "raw_material_rate": -3.0 }"#).unwrap();

        let s = load_settings(&path).unwrap();
        assert_eq!(s.raw_material_rate(), Fixed64::ZERO);

        cleanup(&dir);
    }

    #[test]
    fn bad_quality_level_is_invalid() {
        let dir = make_test_dir("load_bad_quality");
        let path = dir.join("line.toml");
        fs::write(&path, "quality_level = 7\n").unwrap();

        let result = load_settings(&path);
        assert!(matches!(
            result,
            Err(DataLoadError::InvalidValue { field: "quality_level", .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = make_test_dir("load_parse_err");
        let path = dir.join("line.ron");
        fs::write(&path, "(raw_material_rate: ").unwrap();

        assert!(matches!(
            load_settings(&path),
            Err(DataLoadError::Parse { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn missing_file_is_io() {
        let dir = make_test_dir("load_missing");
        assert!(matches!(
            load_settings(&dir.join("nope.json")),
            Err(DataLoadError::Io(_))
        ));
        cleanup(&dir);
    }

    #[test]
    fn non_finite_rate_keeps_default() {
        let data = SettingsData {
            raw_material_rate: f64::INFINITY,
            ..SettingsData::default()
        };
        let s = resolve_settings(&data, Path::new("line.ron")).unwrap();
        assert_eq!(s.raw_material_rate(), Fixed64::from_num(5));
    }
}
