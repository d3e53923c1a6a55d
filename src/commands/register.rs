use anyhow::Result;

use stubsmith::bootstrap::{self, ProviderRegistration};

use super::Context;

pub fn provider(ctx: &Context, after: &str, name: &str, namespace_after: &str, namespace: &str) -> Result<()> {
    let registration = ProviderRegistration {
        after,
        name,
        namespace_after,
        namespace_name: namespace,
    };

    let path = ctx.project.config_path("app.php");
    if bootstrap::install_service_provider_after(&ctx.project, &registration)? {
        println!("✓ Registered {} in {}", registration.class(), ctx.display(&path));
    } else {
        println!("• {} unchanged (already registered or anchor not found)", ctx.display(&path));
    }
    Ok(())
}

pub fn middleware(ctx: &Context, after: &str, name: &str, group: &str) -> Result<()> {
    let path = ctx.project.app_path("Http/Kernel.php");
    if bootstrap::install_middleware_after(&ctx.project, after, name, group)? {
        println!("✓ Registered {name} in '{group}' middleware group");
    } else {
        println!("• {} unchanged (already registered or anchor not found)", ctx.display(&path));
    }
    Ok(())
}
