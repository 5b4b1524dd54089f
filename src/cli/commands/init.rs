//! Init command handler

use crate::config::Config;
use std::path::Path;

pub fn cmd_init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save_to_path(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
