//! Error taxonomy for scaffolding operations
//!
//! Only the fatal conditions live here. Structural mismatches (markers or
//! anchors missing from a target file) are not errors: the patch is skipped.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// A stub was requested before the stub directory was configured
    #[error("Stub directory is not set (use --stubs, STUBSMITH_STUBS_DIR or [stubs] dir in .stubsmith/config.toml)")]
    StubsDirNotSet,

    /// A stub, target file or stub directory does not exist
    #[error("File not found: {}", path.display())]
    MissingFile { path: PathBuf },

    /// composer.json has no PSR-4 entry for app/ and no namespace was configured
    #[error("Unable to detect application namespace from {}", path.display())]
    NamespaceNotFound { path: PathBuf },
}

impl ScaffoldError {
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self::MissingFile { path: path.into() }
    }
}
