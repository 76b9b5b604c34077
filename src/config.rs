use crate::errors::{GridError, GridResult};
use crate::pathfinding::GridBounds;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use validator::Validate;

/// Pathfinding settings, loadable from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
// NOTE: When adding new fields, keep the defaults below in sync
pub struct PathfindingConfig {
    /// Seconds between obstacle refreshes
    #[validate(range(min = 0.01, max = 60.0))]
    pub refresh_interval_secs: f32,
    /// Start the refresh schedule as soon as the service is inserted
    pub autostart: bool,
    /// Seconds a grid walker spends on each cell
    #[validate(range(min = 0.01, max = 10.0))]
    pub walker_step_secs: f32,
    /// Grid coverage; may be supplied later through `PathService::initialize`
    pub bounds: Option<GridBounds>,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 1.0,
            autostart: true,
            walker_step_secs: 0.2,
            bounds: None,
        }
    }
}

impl PathfindingConfig {
    pub fn with_bounds(bounds: GridBounds) -> Self {
        Self {
            bounds: Some(bounds),
            ..Self::default()
        }
    }

    /// Field ranges plus bounds sanity
    pub fn check(&self) -> GridResult<()> {
        self.validate().map_err(|validation_errors| {
            let error_details = validation_errors
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                    format!("{field}: {}", error_msgs.join(", "))
                })
                .collect::<Vec<String>>()
                .join("; ");

            GridError::ConfigValidationFailed {
                reason: error_details,
            }
        })?;

        if let Some(bounds) = &self.bounds {
            bounds.validate()?;
        }
        Ok(())
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("gridpath");
    fs::create_dir_all(&path).ok()?;
    path.push("pathfinding.toml");
    Some(path)
}

/// Load from the user config directory, falling back to defaults
pub fn load_config() -> PathfindingConfig {
    get_config_path()
        .and_then(|path| load_config_from(path).ok())
        .unwrap_or_default()
}

/// Strict load: missing, malformed or out-of-range files are errors
pub fn load_config_from<P: AsRef<Path>>(path: P) -> GridResult<PathfindingConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(GridError::ConfigFileNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = fs::read_to_string(path)?;
    let config = toml::from_str::<PathfindingConfig>(&contents)?;
    config.check()?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(config: &PathfindingConfig, path: P) -> GridResult<()> {
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Save to the user config directory
pub fn save_user_config(config: &PathfindingConfig) -> GridResult<()> {
    let path = get_config_path().ok_or(GridError::ConfigDirNotFound)?;
    save_config(config, path)
}
