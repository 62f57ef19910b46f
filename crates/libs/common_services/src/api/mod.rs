pub mod access;
pub mod auth;
pub mod image;
pub mod patch;
pub mod preference;
pub mod response;
pub mod seed;
pub mod trip;
pub mod user;
pub mod validation;
