//! Configuration file upgrades: detect and fill keys added after the file
//! was first written.

use super::{Config, default_log_level, default_salary_marker, default_subjects};
use crate::core::fees::ProrationPolicy;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Keys every configuration file is expected to carry, with their defaults.
fn expected_keys() -> AppResult<Vec<(&'static str, Value)>> {
    let to_value = |v: Result<Value, serde_yaml::Error>| v.map_err(|_| AppError::ConfigSave);

    Ok(vec![
        (
            "database",
            Value::String(Config::database_file().to_string_lossy().to_string()),
        ),
        ("subjects", to_value(serde_yaml::to_value(default_subjects()))?),
        (
            "proration",
            to_value(serde_yaml::to_value(ProrationPolicy::default()))?,
        ),
        ("salary_marker", Value::String(default_salary_marker())),
        ("log_level", Value::String(default_log_level())),
    ])
}

fn read_mapping(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    let yaml: Value = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;

    match yaml {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config(format!(
            "{}: top level is not a mapping",
            path.display()
        ))),
    }
}

/// Names of expected keys absent from the file at `path`.
pub fn missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let map = read_mapping(path)?;

    Ok(expected_keys()?
        .into_iter()
        .filter(|(k, _)| !map.contains_key(Value::String(k.to_string())))
        .map(|(k, _)| k.to_string())
        .collect())
}

/// Write every missing key with its default value. Returns the keys added.
/// Existing values are never touched.
pub fn add_missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let mut map = read_mapping(path)?;
    let mut added = Vec::new();

    for (key, default) in expected_keys()? {
        let k = Value::String(key.to_string());
        if !map.contains_key(&k) {
            map.insert(k, default);
            added.push(key.to_string());
        }
    }

    if added.is_empty() {
        info("Configuration is up to date.");
        return Ok(added);
    }

    let serialized =
        serde_yaml::to_string(&Value::Mapping(map)).map_err(|_| AppError::ConfigSave)?;
    fs::write(path, serialized).map_err(|_| AppError::ConfigSave)?;

    success(format!(
        "Configuration migrated: added {}",
        added.join(", ")
    ));

    Ok(added)
}
