//! Manifest module - Node package manifest (`package.json`)
//!
//! Reads and rewrites the `dependencies` / `devDependencies` maps. Keys are
//! written sorted; every other part of the manifest keeps its order.
//!
//! # Example
//!
//! ```no_run
//! use stubsmith::manifest;
//! use std::path::Path;
//!
//! manifest::update_node_packages(Path::new("package.json"), true, |mut deps, _| {
//!     deps.insert("vue".to_string(), "^3.4.0".to_string());
//!     deps.remove("react");
//!     deps
//! })?;
//! # Ok::<(), anyhow::Error>(())
//! ```

mod internal;

use anyhow::Result;
use std::path::Path;

pub use internal::{section_key, to_pretty_json, Dependencies};

/// Replace a dependency map through `callback`
///
/// The callback gets the current map (empty when the section is absent) and
/// the section key. A missing manifest skips the update and returns `false`.
pub fn update_node_packages<F>(path: &Path, dev: bool, callback: F) -> Result<bool>
where
    F: FnOnce(Dependencies, &str) -> Dependencies,
{
    internal::update_packages(path, dev, callback)
}

/// Read a dependency map; `None` when the manifest does not exist
pub fn read_node_packages(path: &Path, dev: bool) -> Result<Option<Dependencies>> {
    internal::read_packages(path, dev)
}
