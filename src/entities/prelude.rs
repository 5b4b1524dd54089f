pub use super::admins::Entity as Admins;
pub use super::products::Entity as Products;
pub use super::reviews::Entity as Reviews;
pub use super::site_settings::Entity as SiteSettings;
pub use super::testimonials::Entity as Testimonials;
