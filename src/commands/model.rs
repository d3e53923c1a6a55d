use anyhow::Result;

use stubsmith::packages;

use super::Context;

pub fn qualify(ctx: &Context, name: &str) -> Result<()> {
    println!("{}", ctx.project.qualify_model(name)?);
    Ok(())
}

pub fn php() {
    println!("{}", packages::php_binary().display());
}
