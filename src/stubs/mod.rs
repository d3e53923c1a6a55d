//! Stubs module - Template files copied into a target project
//!
//! A stub is `<stubs dir>/<name>.stub`. The stub directory must be set
//! before any stub is read; requesting one without it is a configuration
//! error.

mod internal;

pub use internal::{apply_replacements, StubStore, STUB_EXTENSION};

use crate::project::Project;

/// Stub store configured from the project (`STUBSMITH_STUBS_DIR`, `[stubs] dir`)
pub fn for_project(project: &Project) -> StubStore {
    StubStore::new(project.stubs_dir())
}
