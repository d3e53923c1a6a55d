use anyhow::Result;

use stubsmith::packages;

use super::Context;

pub fn require(ctx: &Context, packages: &[String], dev: bool) -> Result<()> {
    let kind = if dev { "dev packages" } else { "packages" };
    println!("📦 Requiring composer {kind}: {}", packages.join(" "));

    if packages::require_composer_packages(&ctx.runner, ctx.project.root(), packages, dev)? {
        println!("✅ Composer {kind} installed");
        Ok(())
    } else {
        anyhow::bail!("composer require failed")
    }
}
