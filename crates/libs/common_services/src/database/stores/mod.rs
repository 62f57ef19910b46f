pub mod image_store;
pub mod preference_store;
pub mod trip_store;
pub mod user_store;
