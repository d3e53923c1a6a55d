//! Package manager and toolchain helpers
//!
//! Composer packages are installed with an argv invocation in the project
//! root. Node packages use whichever manager the project's lockfile names.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::process::{self, Invocation, Runner};

/// Node package managers, in lockfile detection order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeManager {
    Pnpm,
    Yarn,
    Npm,
}

impl NodeManager {
    /// Pick the manager from the lockfile present in `root`, npm by default
    pub fn detect(root: &Path) -> Self {
        if root.join("pnpm-lock.yaml").exists() {
            NodeManager::Pnpm
        } else if root.join("yarn.lock").exists() {
            NodeManager::Yarn
        } else {
            NodeManager::Npm
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeManager::Pnpm => "pnpm",
            NodeManager::Yarn => "yarn",
            NodeManager::Npm => "npm",
        }
    }

    /// Install then build
    pub fn install_commands(&self) -> [&'static str; 2] {
        match self {
            NodeManager::Pnpm => ["pnpm install", "pnpm run build"],
            NodeManager::Yarn => ["yarn install", "yarn run build"],
            NodeManager::Npm => ["npm install", "npm run build"],
        }
    }
}

/// Build the `composer require` invocation
pub fn composer_require(root: &Path, packages: &[String], dev: bool) -> Invocation {
    let mut argv = vec!["composer".to_string(), "require".to_string()];
    if dev {
        argv.push("--dev".to_string());
    }
    argv.extend(packages.iter().cloned());

    Invocation::argv(argv)
        .current_dir(root)
        .env("COMPOSER_MEMORY_LIMIT", "-1")
}

/// Install composer packages; returns whether composer exited with 0
pub fn require_composer_packages(
    runner: &dyn Runner,
    root: &Path,
    packages: &[String],
    dev: bool,
) -> Result<bool> {
    let invocation = composer_require(root, packages, dev);
    let code = runner.run(&invocation, &mut |line| println!("{line}"))?;
    Ok(code == 0)
}

/// Install node packages and run the build with the detected manager
pub fn install_node_packages(runner: &dyn Runner, root: &Path) -> Result<bool> {
    let manager = NodeManager::detect(root);
    log::debug!("using {} in {}", manager.name(), root.display());
    process::run_commands(runner, &manager.install_commands(), root)
}

/// Locate the PHP executable
///
/// `PHP_BINARY` when it names an existing file, then `php` on PATH, then plain `php`.
pub fn php_binary() -> PathBuf {
    std::env::var_os("PHP_BINARY")
        .map(PathBuf::from)
        .filter(|path| path.is_file())
        .or_else(|| which::which("php").ok())
        .unwrap_or_else(|| PathBuf::from("php"))
}
