pub mod composer;
pub mod model;
pub mod node;
pub mod register;
pub mod stub;

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use stubsmith::process::TtyMode;
use stubsmith::{stubs, Project, StubStore, SystemRunner};

/// Everything a command needs: the target project, its stubs and a process runner
pub struct Context {
    pub project: Project,
    pub stubs: StubStore,
    pub runner: SystemRunner,
}

impl Context {
    /// Open the project at `path`, or the nearest one above the current directory
    pub fn load(path: Option<&Path>, stubs_dir: Option<PathBuf>, no_tty: bool) -> Result<Self> {
        let project = match path {
            Some(path) => Project::open(path)?,
            None => {
                let cwd = std::env::current_dir().context("Failed to get current directory")?;
                Project::discover(&cwd)?
            }
        };

        let mut stubs = stubs::for_project(&project);
        if let Some(dir) = stubs_dir {
            stubs.set_dir(dir);
        }

        let tty = if no_tty || !project.config().process.tty {
            TtyMode::Never
        } else {
            TtyMode::Auto
        };

        log::debug!("project root: {}", project.root().display());

        Ok(Self {
            project,
            stubs,
            runner: SystemRunner::new(tty),
        })
    }

    /// Resolve a path given on the command line against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.project.base_path(path)
    }

    /// Path for display, relative to the project root when possible
    pub fn display(&self, path: &Path) -> String {
        path.strip_prefix(self.project.root())
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
