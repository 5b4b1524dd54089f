pub mod admin;
pub mod analytics;
pub mod products;
pub mod reviews;
pub mod settings;
pub mod testimonials;
