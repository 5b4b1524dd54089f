//! Show settings command handler

use crate::api::SiteSettingsDto;
use crate::config::Config;
use crate::db::Store;

pub async fn cmd_show_settings(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let settings = store.settings().get_or_create().await?;

    println!("# Site settings (updated {})", settings.updated_at);
    print!("{}", toml::to_string_pretty(&SiteSettingsDto::from(&settings))?);

    Ok(())
}
