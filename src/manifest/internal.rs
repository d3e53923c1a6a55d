//! Internal implementation for manifest module

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Dependency name -> version constraint, sorted by name
pub type Dependencies = BTreeMap<String, String>;

const INDENT: &[u8] = b"    ";

/// Manifest section for the dependency kind
pub fn section_key(dev: bool) -> &'static str {
    if dev {
        "devDependencies"
    } else {
        "dependencies"
    }
}

fn read_manifest(path: &Path) -> Result<Map<String, Value>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse manifest: {}", path.display()))
}

fn section(manifest: &Map<String, Value>, key: &str, path: &Path) -> Result<Dependencies> {
    match manifest.get(key) {
        None => Ok(Dependencies::new()),
        Some(value) => serde_json::from_value(value.clone())
            .with_context(|| format!("Invalid {key} in {}", path.display())),
    }
}

/// Pretty JSON with four-space indentation and a trailing newline
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(String::from_utf8(buf)?)
}

pub fn read_packages(path: &Path, dev: bool) -> Result<Option<Dependencies>> {
    if !path.exists() {
        return Ok(None);
    }
    let manifest = read_manifest(path)?;
    section(&manifest, section_key(dev), path).map(Some)
}

pub fn update_packages<F>(path: &Path, dev: bool, callback: F) -> Result<bool>
where
    F: FnOnce(Dependencies, &str) -> Dependencies,
{
    if !path.exists() {
        log::debug!("no manifest at {}, skipping package update", path.display());
        return Ok(false);
    }

    let key = section_key(dev);
    let mut manifest = read_manifest(path)?;
    let current = section(&manifest, key, path)?;

    let updated = callback(current, key);
    manifest.insert(key.to_string(), serde_json::to_value(updated)?);

    fs::write(path, to_pretty_json(&manifest)?)
        .with_context(|| format!("Failed to write manifest: {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PACKAGE_JSON: &str = r#"{
    "private": true,
    "type": "module",
    "scripts": {
        "dev": "vite",
        "build": "vite build"
    },
    "devDependencies": {
        "vite": "^5.0.0",
        "axios": "^1.6.4"
    }
}
"#;

    fn manifest(contents: &str) -> (TempDir, std::path::PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("package.json");
        fs::write(&path, contents).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_missing_manifest_is_noop() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("package.json");
        let called = std::cell::Cell::new(false);

        let updated = update_packages(&path, true, |deps, _| {
            called.set(true);
            deps
        })
        .unwrap();

        assert!(!updated);
        assert!(!called.get());
        assert!(!path.exists());
        assert!(read_packages(&path, true).unwrap().is_none());
    }

    #[test]
    fn test_update_sorts_and_preserves_other_keys() {
        let (_tmp, path) = manifest(PACKAGE_JSON);

        update_packages(&path, true, |mut deps, key| {
            assert_eq!(key, "devDependencies");
            deps.insert("@vitejs/plugin-vue".to_string(), "^5.0.0".to_string());
            deps
        })
        .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let expected = r#"{
    "private": true,
    "type": "module",
    "scripts": {
        "dev": "vite",
        "build": "vite build"
    },
    "devDependencies": {
        "@vitejs/plugin-vue": "^5.0.0",
        "axios": "^1.6.4",
        "vite": "^5.0.0"
    }
}
"#;
        assert_eq!(written, expected);
    }

    #[test]
    fn test_missing_section_is_appended() {
        let (_tmp, path) = manifest(r#"{"name": "shop"}"#);

        update_packages(&path, false, |mut deps, key| {
            assert_eq!(key, "dependencies");
            assert!(deps.is_empty());
            deps.insert("vue".to_string(), "^3.4.0".to_string());
            deps
        })
        .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "{\n    \"name\": \"shop\",\n    \"dependencies\": {\n        \"vue\": \"^3.4.0\"\n    }\n}\n"
        );
    }

    #[test]
    fn test_round_trip() {
        let (_tmp, path) = manifest("{}");
        let mut wanted = Dependencies::new();
        wanted.insert("tailwindcss".to_string(), "^3.4.0".to_string());
        wanted.insert("alpinejs".to_string(), "^3.13.3".to_string());

        let to_write = wanted.clone();
        update_packages(&path, true, move |_, _| to_write).unwrap();

        assert_eq!(read_packages(&path, true).unwrap(), Some(wanted));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.find("alpinejs").unwrap() < written.find("tailwindcss").unwrap());
    }

    #[test]
    fn test_invalid_manifest_is_error() {
        let (_tmp, path) = manifest("not json");
        assert!(update_packages(&path, true, |deps, _| deps).is_err());
    }
}
