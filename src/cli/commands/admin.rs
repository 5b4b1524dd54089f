//! Admin account command handlers

use crate::config::Config;
use crate::constants::limits::USERNAME_MAX_LEN;
use crate::db::Store;
use crate::domain::validate;

fn check_password(config: &Config, password: &str) -> anyhow::Result<()> {
    let min = config.security.min_password_length;
    if password.chars().count() < min {
        anyhow::bail!("Password must be at least {min} characters");
    }
    Ok(())
}

pub async fn cmd_create_admin(config: &Config, username: &str, password: &str) -> anyhow::Result<()> {
    let username = validate::required_text("username", username, USERNAME_MAX_LEN)
        .map_err(anyhow::Error::msg)?;
    check_password(config, password)?;

    let store = Store::new(&config.general.database_path).await?;

    match store
        .create_admin(&username, password, Some(&config.security))
        .await?
    {
        Some(admin) => {
            println!("Created admin '{}' (id {})", admin.username, admin.id);
            Ok(())
        }
        None => anyhow::bail!("Admin '{username}' already exists"),
    }
}

pub async fn cmd_set_password(config: &Config, username: &str, password: &str) -> anyhow::Result<()> {
    check_password(config, password)?;

    let store = Store::new(&config.general.database_path).await?;

    if store.get_admin_by_username(username).await?.is_none() {
        anyhow::bail!("Admin '{username}' not found");
    }

    store
        .update_admin_password(username, password, Some(&config.security))
        .await?;

    println!("Password updated for '{username}'");
    Ok(())
}
