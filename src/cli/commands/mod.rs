mod admin;
mod init;
mod settings;

pub use admin::{cmd_create_admin, cmd_set_password};
pub use init::cmd_init;
pub use settings::cmd_show_settings;
