use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    tracing::debug!(path = %canonical.display(), bytes = contents.len(), "parsed input file");
    Ok(value)
}

/// Resolve a possibly relative path against the working directory and check
/// it names an existing regular file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_tco_core::tco::params::ScenarioParams;

    #[test]
    fn test_missing_file_reported() {
        let err = read_json::<ScenarioParams>("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_reads_scenario_file() {
        let path = std::env::temp_dir().join("asset_tco_cli_scenario_test.json");
        let params = ScenarioParams::default();
        fs::write(&path, serde_json::to_string(&params).unwrap()).unwrap();

        let read: ScenarioParams = read_json(path.to_str().unwrap()).unwrap();
        assert_eq!(read, params);

        let _ = fs::remove_file(&path);
    }
}
