use anyhow::Result;
use std::path::Path;

use stubsmith::files;

use super::Context;

pub fn copy(ctx: &Context, name: &str, destination: &Path, replace: &[String]) -> Result<()> {
    let pairs = parse_replacements(replace)?;
    let dest = ctx.resolve(destination);

    ctx.stubs.copy_stub(name, &dest, &pairs)?;
    println!("✓ Created {}", ctx.display(&dest));
    Ok(())
}

pub fn copy_dir(ctx: &Context, dir: &str, destination: &Path) -> Result<()> {
    let dest = ctx.resolve(destination);
    ctx.stubs.copy_stubs_dir(dir, &dest)?;
    println!("✓ Copied {dir} to {}", ctx.display(&dest));
    Ok(())
}

pub fn replace(ctx: &Context, search: &str, replace: &str, file: &Path) -> Result<()> {
    let path = ctx.resolve(file);
    if files::replace_in_file(search, replace, &path)? {
        println!("✓ Updated {}", ctx.display(&path));
    } else {
        println!("• {} unchanged", ctx.display(&path));
    }
    Ok(())
}

pub fn mkdir(ctx: &Context, path: &Path) -> Result<()> {
    let dir = ctx.resolve(path);
    files::make_dir(&dir)?;
    println!("✓ {}", ctx.display(&dir));
    Ok(())
}

/// Split `SEARCH=REPLACE` arguments, keeping their order
fn parse_replacements(args: &[String]) -> Result<Vec<(&str, &str)>> {
    args.iter()
        .map(|arg| match arg.split_once('=') {
            Some((search, replace)) if !search.is_empty() => Ok((search, replace)),
            _ => Err(anyhow::anyhow!(
                "Invalid replacement '{arg}', expected SEARCH=REPLACE"
            )),
        })
        .collect()
}
