//! Project module - Target project context
//!
//! Resolves paths inside the project being scaffolded (`config/`, `app/`,
//! `package.json`), its root namespace, and the tool settings stored in
//! `.stubsmith/config.toml`.
//!
//! # Example
//!
//! ```no_run
//! use stubsmith::project::Project;
//! use std::path::Path;
//!
//! let project = Project::discover(Path::new("."))?;
//! println!("Kernel: {}", project.app_path("Http/Kernel.php").display());
//! println!("Model: {}", project.qualify_model("Billing/Invoice")?);
//! # Ok::<(), anyhow::Error>(())
//! ```

mod internal;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub use internal::{AppSection, ProcessSection, StubsSection, ToolConfig, STUBS_DIR_ENV};

/// Load tool config from `.stubsmith/config.toml`, default when absent
pub fn load(project_path: &Path) -> Result<ToolConfig> {
    internal::load(project_path)
}

/// Save tool config to `.stubsmith/config.toml`
pub fn save(project_path: &Path, config: &ToolConfig) -> Result<()> {
    internal::save(project_path, config)
}

/// A target project rooted at a directory
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: ToolConfig,
}

impl Project {
    /// Open a project at `root` and load its tool config
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config = load(&root)?;
        Ok(Self { root, config })
    }

    /// Open the nearest project at or above `start`
    pub fn discover(start: &Path) -> Result<Self> {
        let start = start
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", start.display()))?;
        match internal::find_root(&start) {
            Some(root) => Self::open(root),
            None => anyhow::bail!(
                "Not in a project (no composer.json or artisan found above {})",
                start.display()
            ),
        }
    }

    pub fn with_config(root: impl Into<PathBuf>, config: ToolConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Path relative to the project root
    pub fn base_path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join(rel)
    }

    /// Path inside `config/`
    pub fn config_path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join("config").join(rel)
    }

    /// Path inside `app/`
    pub fn app_path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join("app").join(rel)
    }

    /// The node package manifest, `package.json`
    pub fn manifest_path(&self) -> PathBuf {
        self.base_path("package.json")
    }

    /// Stub directory: `STUBSMITH_STUBS_DIR`, then `[stubs] dir`
    ///
    /// Relative directories resolve against the project root.
    pub fn stubs_dir(&self) -> Option<PathBuf> {
        std::env::var_os(STUBS_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| self.config.stubs.dir.clone())
            .map(|dir| self.root.join(dir))
    }

    /// Root namespace, from config or composer.json
    pub fn root_namespace(&self) -> Result<String> {
        match &self.config.app.namespace {
            Some(namespace) => Ok(namespace.clone()),
            None => internal::detect_namespace(&self.root),
        }
    }

    /// Fully qualify a model class name
    pub fn qualify_model(&self, model: &str) -> Result<String> {
        let namespace = self.root_namespace()?;
        let has_models_dir = self.app_path("Models").is_dir();
        Ok(internal::qualify_model(model, &namespace, has_models_dir))
    }
}
