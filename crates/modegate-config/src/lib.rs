use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use modegate_types::{ModeConfig, ModeSource, ModeValidationError};

/// Environment variable overriding the global config directory.
pub const HOME_ENV: &str = "MODEGATE_HOME";

/// Name of the config directory, both global and per workspace.
const CONFIG_DIR_NAME: &str = ".modegate";

const MODES_FILE_NAME: &str = "modes.json5";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON5 parse error in {}: {source}", .path.display())]
    Json5 {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },
    #[error("Invalid mode in {}: {source}", .path.display())]
    InvalidMode {
        path: PathBuf,
        #[source]
        source: ModeValidationError,
    },
    #[error("Duplicate mode slug {slug} in {}", .path.display())]
    DuplicateSlug { path: PathBuf, slug: String },
    #[error("Config directory not found")]
    NoDirFound,
}

/// Contents of a `modes.json5` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModesFile {
    /// Custom mode definitions, in priority order.
    #[serde(default)]
    pub custom_modes: Vec<ModeConfig>,
}

/// Resolve the global config directory (`$MODEGATE_HOME` or `~/.modegate/`).
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|h| h.join(CONFIG_DIR_NAME))
        .ok_or(ConfigError::NoDirFound)
}

/// Resolve the global modes file path.
pub fn global_modes_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(MODES_FILE_NAME))
}

/// Resolve the project modes file path for `workspace`.
pub fn project_modes_path(workspace: &Path) -> PathBuf {
    workspace.join(CONFIG_DIR_NAME).join(MODES_FILE_NAME)
}

/// Load custom modes from the global file and, if given, the workspace file.
///
/// Project modes come first and win on slug collisions, so the result can be
/// passed straight to mode resolution where the first match wins.
pub fn load_custom_modes(workspace: Option<&Path>) -> Result<Vec<ModeConfig>, ConfigError> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    load_custom_modes_from(&global_modes_path()?, workspace)
}

/// Like [`load_custom_modes`], with an explicit global modes file.
pub fn load_custom_modes_from(
    global_path: &Path,
    workspace: Option<&Path>,
) -> Result<Vec<ModeConfig>, ConfigError> {
    let mut modes = match workspace {
        Some(dir) => load_modes_from(&project_modes_path(dir), ModeSource::Project)?,
        None => Vec::new(),
    };

    let global = load_modes_from(global_path, ModeSource::Global)?;
    let project_slugs: HashSet<String> = modes.iter().map(|m| m.slug.clone()).collect();
    for mode in global {
        if project_slugs.contains(&mode.slug) {
            tracing::debug!(slug = %mode.slug, "Global mode shadowed by project mode");
            continue;
        }
        modes.push(mode);
    }

    Ok(modes)
}

/// Load and validate custom modes from a specific file, tagging each with `source`.
///
/// A missing file yields no modes.
pub fn load_modes_from(path: &Path, source: ModeSource) -> Result<Vec<ModeConfig>, ConfigError> {
    if !path.exists() {
        tracing::debug!("Modes file not found at {}, using none", path.display());
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)?;
    let file: ModesFile = json5::from_str(&content).map_err(|source| ConfigError::Json5 {
        path: path.to_path_buf(),
        source,
    })?;

    let mut seen = HashSet::new();
    let mut modes = Vec::with_capacity(file.custom_modes.len());
    for mut mode in file.custom_modes {
        mode.validate().map_err(|source| ConfigError::InvalidMode {
            path: path.to_path_buf(),
            source,
        })?;
        if !seen.insert(mode.slug.clone()) {
            return Err(ConfigError::DuplicateSlug {
                path: path.to_path_buf(),
                slug: mode.slug,
            });
        }
        mode.source = Some(source);
        modes.push(mode);
    }

    tracing::debug!(count = modes.len(), path = %path.display(), "Loaded custom modes");
    Ok(modes)
}

/// Write custom modes to `path`, creating parent directories as needed.
///
/// The `source` tag is runtime-only and is not written.
pub fn save_modes(path: &Path, modes: &[ModeConfig]) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
    }

    let file = ModesFile {
        custom_modes: modes
            .iter()
            .cloned()
            .map(|mut m| {
                m.source = None;
                m
            })
            .collect(),
    };
    let content = serde_json::to_string_pretty(&file)
        .map_err(|e| ConfigError::Io(std::io::Error::other(e)))?;
    std::fs::write(path, content)?;
    Ok(())
}
