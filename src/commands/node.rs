use anyhow::Result;

use stubsmith::{files, manifest, packages};

use super::Context;

pub fn add(ctx: &Context, specs: &[String], dev: bool) -> Result<()> {
    let additions: Vec<(String, String)> = specs.iter().map(|s| parse_spec(s)).collect();
    let path = ctx.project.manifest_path();

    let updated = manifest::update_node_packages(&path, dev, |mut deps, key| {
        for (name, constraint) in additions {
            println!("  + {name}@{constraint} ({key})");
            deps.insert(name, constraint);
        }
        deps
    })?;

    if !updated {
        println!("• No package.json found, skipping");
    }
    Ok(())
}

pub fn remove(ctx: &Context, names: &[String], dev: bool) -> Result<()> {
    let path = ctx.project.manifest_path();

    let updated = manifest::update_node_packages(&path, dev, |mut deps, key| {
        for name in names {
            if deps.remove(name).is_some() {
                println!("  - {name} ({key})");
            }
        }
        deps
    })?;

    if !updated {
        println!("• No package.json found, skipping");
    }
    Ok(())
}

pub fn install(ctx: &Context) -> Result<()> {
    let manager = packages::NodeManager::detect(ctx.project.root());
    println!("📦 Installing node packages with {}...", manager.name());

    if packages::install_node_packages(&ctx.runner, ctx.project.root())? {
        println!("✅ Node packages installed and built");
        Ok(())
    } else {
        anyhow::bail!("{} install failed", manager.name())
    }
}

pub fn flush(ctx: &Context) -> Result<()> {
    let removed = files::flush_node_modules(ctx.project.root())?;
    if removed.is_empty() {
        println!("• Nothing to flush");
    }
    for entry in removed {
        println!("  - {entry}");
    }
    Ok(())
}

/// `name@constraint`; scoped names keep their leading `@`. No constraint means `*`
fn parse_spec(spec: &str) -> (String, String) {
    let split_at = spec
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '@')
        .map(|(i, _)| i);

    match split_at {
        Some(i) if i + 1 < spec.len() => (spec[..i].to_string(), spec[i + 1..].to_string()),
        Some(i) => (spec[..i].to_string(), "*".to_string()),
        None => (spec.to_string(), "*".to_string()),
    }
}
