pub mod app_user;
pub mod image;
pub mod preference;
pub mod trip;
