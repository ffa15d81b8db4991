//! Locates and loads the configuration file.
//!
//! Lookup order, first hit wins:
//!
//! 1. `--config` (or `$TFSTYLE_CONFIG`)
//! 2. `tfstyle.toml`, then `.tfstyle.toml`, in the project directory
//! 3. `config.toml` in the global directory (`$TFSTYLE_CONFIG_DIR`, else `~/.tfstyle/`)
//! 4. Built-in defaults

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tfstyle::Config;
use tracing::{debug, info};

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named on the command line.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Found in the global directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Path of the file to read, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }
}

const GLOBAL_FILE: &str = "config.toml";

/// Directory in which to look for a project config, given the checked paths.
#[must_use]
pub fn project_dir(paths: &[PathBuf]) -> PathBuf {
    match paths.first() {
        Some(p) if p.is_dir() => p.clone(),
        Some(p) => p
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        None => PathBuf::from("."),
    }
}

/// Finds the configuration file for `project`.
#[must_use]
pub fn resolve(project: &Path, explicit: Option<&Path>) -> ConfigSource {
    locate(project, explicit, global_config_dir().as_deref())
}

fn locate(project: &Path, explicit: Option<&Path>, global: Option<&Path>) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }
    if let Some(found) = tfstyle::find_project_config(project) {
        debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }
    if let Some(found) = global.map(|dir| dir.join(GLOBAL_FILE)).filter(|p| p.is_file()) {
        debug!("Found global config: {}", found.display());
        return ConfigSource::Global(found);
    }
    ConfigSource::Default
}

/// Reads the configuration the source points at.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load(source: &ConfigSource) -> Result<Config> {
    let Some(path) = source.path() else {
        debug!("No config file found; using defaults");
        return Ok(Config::default());
    };
    if matches!(source, ConfigSource::Global(_)) {
        info!("Using global config: {}", path.display());
    }
    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

/// Global config directory: `$TFSTYLE_CONFIG_DIR`, else `~/.tfstyle/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("TFSTYLE_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".tfstyle"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_wins_and_is_not_checked() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("tfstyle.toml"), "").unwrap();
        let explicit = Path::new("/nonexistent.toml");
        assert_eq!(
            locate(project.path(), Some(explicit), None),
            ConfigSource::Explicit(explicit.to_path_buf())
        );
    }

    #[test]
    fn project_files_in_order() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join(".tfstyle.toml"), "").unwrap();
        assert_eq!(
            locate(project.path(), None, None),
            ConfigSource::Project(project.path().join(".tfstyle.toml"))
        );

        fs::write(project.path().join("tfstyle.toml"), "").unwrap();
        assert_eq!(
            locate(project.path(), None, None),
            ConfigSource::Project(project.path().join("tfstyle.toml"))
        );
    }

    #[test]
    fn global_is_the_fallback() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        assert_eq!(
            locate(project.path(), None, Some(global.path())),
            ConfigSource::Default
        );

        fs::write(global.path().join("config.toml"), "").unwrap();
        assert_eq!(
            locate(project.path(), None, Some(global.path())),
            ConfigSource::Global(global.path().join("config.toml"))
        );

        fs::write(project.path().join("tfstyle.toml"), "").unwrap();
        assert!(matches!(
            locate(project.path(), None, Some(global.path())),
            ConfigSource::Project(_)
        ));
    }

    #[test]
    fn load_reads_and_reports() {
        let project = TempDir::new().unwrap();
        let path = project.path().join("tfstyle.toml");
        fs::write(&path, "preset = \"strict\"\n").unwrap();
        let config = load(&ConfigSource::Project(path.clone())).unwrap();
        assert_eq!(config.preset.as_deref(), Some("strict"));

        fs::write(&path, "preset = [").unwrap();
        let err = load(&ConfigSource::Project(path)).unwrap_err();
        assert!(err.to_string().starts_with("Failed to load config"));

        assert!(load(&ConfigSource::Default).unwrap().preset.is_none());
    }

    #[test]
    fn project_dir_from_paths() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(project_dir(&[tmp.path().to_path_buf()]), tmp.path());
        assert_eq!(
            project_dir(&[tmp.path().join("main.tf")]),
            tmp.path().to_path_buf()
        );
        assert_eq!(project_dir(&[PathBuf::from("main.tf")]), PathBuf::from("."));
        assert_eq!(project_dir(&[]), PathBuf::from("."));
    }
}
