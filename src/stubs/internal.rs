//! Internal implementation for stubs module

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ScaffoldError;
use crate::files;

/// File extension of stub templates
pub const STUB_EXTENSION: &str = "stub";

/// Stub templates read from a configured directory
#[derive(Debug, Clone, Default)]
pub struct StubStore {
    dir: Option<PathBuf>,
}

impl StubStore {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn set_dir(&mut self, dir: impl Into<PathBuf>) {
        self.dir = Some(dir.into());
    }

    /// The configured stub directory
    pub fn stubs_path(&self) -> Result<&Path> {
        self.dir
            .as_deref()
            .ok_or_else(|| ScaffoldError::StubsDirNotSet.into())
    }

    /// Path of `<dir>/<name>.stub`
    pub fn stub_path(&self, name: &str) -> Result<PathBuf> {
        Ok(self
            .stubs_path()?
            .join(format!("{name}.{STUB_EXTENSION}")))
    }

    pub fn get_stub(&self, name: &str) -> Result<String> {
        let path = self.stub_path(name)?;
        if !path.is_file() {
            return Err(ScaffoldError::missing(path).into());
        }
        fs::read_to_string(&path).with_context(|| format!("Failed to read stub: {}", path.display()))
    }

    /// Stub content with each `(search, replace)` applied in order
    pub fn replace_in_stub(&self, name: &str, replace: &[(&str, &str)]) -> Result<String> {
        let stub = self.get_stub(name)?;
        Ok(apply_replacements(stub, replace))
    }

    pub fn copy_stub(&self, name: &str, destination: &Path, replace: &[(&str, &str)]) -> Result<()> {
        let content = if replace.is_empty() {
            self.get_stub(name)?
        } else {
            self.replace_in_stub(name, replace)?
        };

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            files::make_dir(parent)?;
        }

        fs::write(destination, content)
            .with_context(|| format!("Failed to write {}", destination.display()))?;
        log::debug!("copied stub {name} -> {}", destination.display());
        Ok(())
    }

    /// Copy `<dir>/<sub_dir>` recursively to `destination`
    pub fn copy_stubs_dir(&self, sub_dir: &str, destination: &Path) -> Result<()> {
        let src = self.stubs_path()?.join(sub_dir.trim_start_matches(['/', '\\']));
        if !src.is_dir() {
            return Err(ScaffoldError::missing(src).into());
        }
        files::copy_dir_recursive(&src, destination)?;
        log::debug!("copied stub dir {} -> {}", src.display(), destination.display());
        Ok(())
    }
}

/// Sequential literal replacement; later pairs see the output of earlier ones
pub fn apply_replacements(mut text: String, replace: &[(&str, &str)]) -> String {
    for (search, replacement) in replace {
        if !search.is_empty() {
            text = text.replace(search, replacement);
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(stubs: &[(&str, &str)]) -> (TempDir, StubStore) {
        let tmp = TempDir::new().unwrap();
        for (name, content) in stubs {
            fs::write(tmp.path().join(format!("{name}.stub")), content).unwrap();
        }
        let store = StubStore::new(Some(tmp.path().to_path_buf()));
        (tmp, store)
    }

    #[test]
    fn test_unset_dir_is_configuration_error() {
        let store = StubStore::default();
        let err = store.get_stub("Model").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScaffoldError>(),
            Some(ScaffoldError::StubsDirNotSet)
        ));
    }

    #[test]
    fn test_missing_stub() {
        let (_tmp, store) = store_with(&[]);
        let err = store.get_stub("Model").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScaffoldError>(),
            Some(ScaffoldError::MissingFile { .. })
        ));
    }

    #[test]
    fn test_get_stub() {
        let (_tmp, store) = store_with(&[("Model", "class {{ name }} {}")]);
        assert_eq!(store.get_stub("Model").unwrap(), "class {{ name }} {}");
    }

    #[test]
    fn test_replacements_are_sequential() {
        let text = apply_replacements("{a}".to_string(), &[("{a}", "{b}"), ("{b}", "done")]);
        assert_eq!(text, "done");
    }

    #[test]
    fn test_copy_stub_with_replacements() {
        let (tmp, store) = store_with(&[("Model", "namespace DummyNamespace;\nclass DummyClass {}\n")]);
        let dest = tmp.path().join("out/app/Models/Post.php");

        store
            .copy_stub("Model", &dest, &[("DummyNamespace", "App\\Models"), ("DummyClass", "Post")])
            .unwrap();

        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "namespace App\\Models;\nclass Post {}\n"
        );
    }

    #[test]
    fn test_copy_stub_verbatim() {
        let (tmp, store) = store_with(&[("vite.config", "export default {}\n")]);
        let dest = tmp.path().join("vite.config.js");
        store.copy_stub("vite.config", &dest, &[]).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "export default {}\n");
    }

    #[test]
    fn test_copy_stubs_dir() {
        let (tmp, store) = store_with(&[]);
        let views = tmp.path().join("views/layouts");
        fs::create_dir_all(&views).unwrap();
        fs::write(views.join("app.blade.php"), "<html></html>").unwrap();

        let dest = tmp.path().join("target/resources/views");
        store.copy_stubs_dir("/views", &dest).unwrap();
        assert!(dest.join("layouts/app.blade.php").exists());
    }

    #[test]
    fn test_copy_missing_stubs_dir() {
        let (tmp, store) = store_with(&[]);
        assert!(store.copy_stubs_dir("nope", &tmp.path().join("out")).is_err());
    }
}
