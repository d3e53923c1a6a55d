//! Internal implementation for project module
//!
//! Handles .stubsmith/config.toml and the layout of the target project.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ScaffoldError;

/// Environment variable overriding `[stubs] dir`
pub const STUBS_DIR_ENV: &str = "STUBSMITH_STUBS_DIR";

// =============================================================================
// Config Types
// =============================================================================

/// Tool configuration stored in .stubsmith/config.toml
/// All sections are optional with defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default)]
    pub stubs: StubsSection,
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub process: ProcessSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StubsSection {
    /// Directory holding `<name>.stub` files. Relative paths resolve against the project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppSection {
    /// Root namespace, e.g. `App\`. Detected from composer.json when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessSection {
    /// Attach child processes to /dev/tty when available
    #[serde(default = "default_tty")]
    pub tty: bool,
}

fn default_tty() -> bool {
    true
}

impl Default for ProcessSection {
    fn default() -> Self {
        Self { tty: default_tty() }
    }
}

// =============================================================================
// Path Functions
// =============================================================================

pub fn tool_dir(project_path: &Path) -> PathBuf {
    project_path.join(".stubsmith")
}

pub fn tool_config_path(project_path: &Path) -> PathBuf {
    tool_dir(project_path).join("config.toml")
}

// =============================================================================
// Detection
// =============================================================================

/// Check if a directory looks like the root of a target project
pub fn is_project_root(path: &Path) -> bool {
    path.join("composer.json").exists() || path.join("artisan").exists()
}

/// Walk up from `start` to the nearest project root
pub fn find_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| is_project_root(dir))
        .map(Path::to_path_buf)
}

// =============================================================================
// Config Load/Save
// =============================================================================

/// Load config from .stubsmith/config.toml, default when absent
pub fn load(project_path: &Path) -> Result<ToolConfig> {
    let path = tool_config_path(project_path);

    if !path.exists() {
        return Ok(ToolConfig::default());
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;

    toml::from_str(&contents).with_context(|| format!("Failed to parse config: {}", path.display()))
}

pub fn save(project_path: &Path, config: &ToolConfig) -> Result<()> {
    let path = tool_config_path(project_path);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    fs::write(&path, contents)?;
    Ok(())
}

// =============================================================================
// Namespace
// =============================================================================

/// Read the PSR-4 namespace mapped to `app/` from composer.json
pub fn detect_namespace(project_path: &Path) -> Result<String> {
    let path = project_path.join("composer.json");
    let not_found = || ScaffoldError::NamespaceNotFound { path: path.clone() };

    let contents = fs::read_to_string(&path).map_err(|_| not_found())?;
    let composer: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let Some(psr4) = composer
        .pointer("/autoload/psr-4")
        .and_then(|v| v.as_object())
    else {
        return Err(not_found().into());
    };

    // A PSR-4 value is either one directory or a list of them
    let maps_to_app = |value: &serde_json::Value| match value {
        serde_json::Value::String(dir) => is_app_dir(dir),
        serde_json::Value::Array(dirs) => dirs
            .iter()
            .filter_map(|d| d.as_str())
            .any(is_app_dir),
        _ => false,
    };

    psr4.iter()
        .find(|(_, dirs)| maps_to_app(dirs))
        .map(|(namespace, _)| namespace.clone())
        .ok_or_else(|| not_found().into())
}

fn is_app_dir(dir: &str) -> bool {
    dir.trim_start_matches("./").trim_end_matches('/') == "app"
}

/// Qualify a model name against the root namespace
///
/// `app_models_dir` tells whether `app/Models` exists in the project.
pub fn qualify_model(model: &str, root_namespace: &str, app_models_dir: bool) -> String {
    let model = model
        .trim_start_matches(['\\', '/'])
        .replace('/', "\\");

    if model.starts_with(root_namespace) {
        return model;
    }

    if app_models_dir {
        format!("{root_namespace}Models\\{model}")
    } else {
        format!("{root_namespace}{model}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const COMPOSER: &str = r#"{
        "name": "acme/shop",
        "autoload": {
            "psr-4": {
                "Database\\Factories\\": "database/factories/",
                "Acme\\": "app/"
            }
        }
    }"#;

    #[test]
    fn test_default_config() {
        let config = ToolConfig::default();
        assert!(config.stubs.dir.is_none());
        assert!(config.app.namespace.is_none());
        assert!(config.process.tty);
    }

    #[test]
    fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let mut config = ToolConfig::default();
        config.stubs.dir = Some(PathBuf::from("stubs"));
        config.process.tty = false;

        save(tmp.path(), &config).unwrap();
        let loaded = load(tmp.path()).unwrap();

        assert_eq!(loaded.stubs.dir, Some(PathBuf::from("stubs")));
        assert!(!loaded.process.tty);
    }

    #[test]
    fn test_load_partial_config() {
        let tmp = TempDir::new().unwrap();
        let path = tool_config_path(tmp.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[app]\nnamespace = \"Shop\\\\\"\n").unwrap();

        let config = load(tmp.path()).unwrap();
        assert_eq!(config.app.namespace.as_deref(), Some("Shop\\"));
        assert!(config.process.tty);
    }

    #[test]
    fn test_load_missing_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load(tmp.path()).unwrap();
        assert!(config.stubs.dir.is_none());
    }

    #[test]
    fn test_find_root_walks_up() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("composer.json"), "{}").unwrap();
        let nested = tmp.path().join("app/Http");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_root(&nested), Some(tmp.path().to_path_buf()));
    }

    #[test]
    fn test_detect_namespace() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("composer.json"), COMPOSER).unwrap();
        assert_eq!(detect_namespace(tmp.path()).unwrap(), "Acme\\");
    }

    #[test]
    fn test_detect_namespace_from_list() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("composer.json"),
            r#"{"autoload": {"psr-4": {"App\\": ["src/", "./app"]}}}"#,
        )
        .unwrap();
        assert_eq!(detect_namespace(tmp.path()).unwrap(), "App\\");
    }

    #[test]
    fn test_detect_namespace_missing() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("composer.json"), r#"{"name": "x"}"#).unwrap();
        let err = detect_namespace(tmp.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScaffoldError>(),
            Some(ScaffoldError::NamespaceNotFound { .. })
        ));
    }

    #[test]
    fn test_qualify_model() {
        assert_eq!(qualify_model("User", "App\\", true), "App\\Models\\User");
        assert_eq!(qualify_model("User", "App\\", false), "App\\User");
        assert_eq!(qualify_model("/Billing/Invoice", "App\\", true), "App\\Models\\Billing\\Invoice");
        assert_eq!(qualify_model("\\App\\Models\\User", "App\\", true), "App\\Models\\User");
    }
}
