pub mod common;
pub mod deferred_user;
pub mod optional_user;
pub mod require_role;
pub mod user;
