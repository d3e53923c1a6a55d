//! Registration of service providers and middleware in a project's bootstrap files
//!
//! `config/app.php` gets provider classes inserted after an existing provider.
//! `app/Http/Kernel.php` gets middleware inserted into a middleware group.
//! Both are idempotent and leave files whose layout does not match alone.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::files;
use crate::patch::{self, Entry, Patch};
use crate::project::Project;

pub const DEFAULT_PROVIDER_NAMESPACE: &str = "App\\Providers\\";
pub const DEFAULT_MIDDLEWARE_GROUP: &str = "web";

const PROVIDER_INDENT: &str = "        ";
const MIDDLEWARE_INDENT: &str = "            ";
const MIDDLEWARE_GROUPS_START: &str = "$middlewareGroups = [";
const MIDDLEWARE_GROUPS_END: &str = "];";
const GROUP_END: &str = "],";

/// A provider to register after an existing one
#[derive(Debug, Clone)]
pub struct ProviderRegistration<'a> {
    pub after: &'a str,
    pub name: &'a str,
    pub namespace_after: &'a str,
    pub namespace_name: &'a str,
}

impl<'a> ProviderRegistration<'a> {
    pub fn new(after: &'a str, name: &'a str) -> Self {
        Self {
            after,
            name,
            namespace_after: DEFAULT_PROVIDER_NAMESPACE,
            namespace_name: DEFAULT_PROVIDER_NAMESPACE,
        }
    }

    /// `<namespace><name>::class`
    pub fn class(&self) -> String {
        format!("{}{}::class", self.namespace_name, self.name)
    }

    fn anchor(&self) -> String {
        format!("{}{}::class,", self.namespace_after, self.after)
    }
}

/// Insert a provider into the provider list of `content`
///
/// The guard covers the whole file: a provider mentioned anywhere is registered.
pub fn register_provider(content: &str, registration: &ProviderRegistration) -> Patch {
    let class = registration.class();
    if content.contains(&class) {
        return Patch::AlreadyPresent;
    }

    let anchor = registration.anchor();
    let line = format!("{class},");
    let entry = Entry::new(&anchor, &line).with_indent(PROVIDER_INDENT);

    let patched = patch::append_after_line(content, &entry);
    if patched == content {
        Patch::AnchorNotFound
    } else {
        Patch::Inserted(patched)
    }
}

/// Insert middleware `name` after `after` in `group` of the kernel's `$middlewareGroups`
pub fn register_middleware(content: &str, after: &str, name: &str, group: &str) -> Patch {
    let group_start = format!("'{group}' => [");
    let anchor = format!("{after},");
    let line = format!("{name},");
    let entry = Entry::new(&anchor, &line)
        .with_indent(MIDDLEWARE_INDENT)
        .with_guard(name);

    patch::try_patch_nested_list(
        content,
        &[
            (MIDDLEWARE_GROUPS_START, MIDDLEWARE_GROUPS_END),
            (group_start.as_str(), GROUP_END),
        ],
        &entry,
    )
}

/// Register a provider in `config/app.php`; returns whether the file changed
pub fn install_service_provider_after(
    project: &Project,
    registration: &ProviderRegistration,
) -> Result<bool> {
    let path = project.config_path("app.php");
    apply(&path, |content| register_provider(content, registration))
}

/// Register middleware in `app/Http/Kernel.php`; returns whether the file changed
pub fn install_middleware_after(project: &Project, after: &str, name: &str, group: &str) -> Result<bool> {
    let path = project.app_path("Http/Kernel.php");
    apply(&path, |content| register_middleware(content, after, name, group))
}

fn apply(path: &Path, patcher: impl FnOnce(&str) -> Patch) -> Result<bool> {
    let content = files::read_existing(path)?;

    match patcher(&content) {
        Patch::Inserted(modified) => {
            fs::write(path, modified).with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(true)
        }
        outcome => {
            log::debug!("{}: left unchanged ({outcome:?})", path.display());
            Ok(false)
        }
    }
}
