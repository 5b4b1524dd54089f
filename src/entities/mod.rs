pub mod prelude;

pub mod admins;
pub mod products;
pub mod reviews;
pub mod site_settings;
pub mod testimonials;
