//! JSON file helpers shared by the calibration tools.
//!
//! - `load_json_file`: read and parse any deserializable value.
//! - `write_json_file`: pretty-print a serializable value to disk.
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Parse the JSON file at `path`.
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse JSON {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Region;

    #[test]
    fn json_file_round_trip_creates_directories() {
        let dir = std::env::temp_dir().join(format!("phase_calib_io_{}", std::process::id()));
        let path = dir.join("nested").join("regions.json");
        let regions = vec![Region::new(3, 9), Region::with_holes(12, 1, [14])];
        write_json_file(&path, &regions).unwrap();
        let back: Vec<Region> = load_json_file(&path).unwrap();
        assert_eq!(back, regions);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_json_file::<Vec<Region>>(Path::new("/nonexistent/scan.json")).unwrap_err();
        assert!(err.contains("/nonexistent/scan.json"));
    }
}
