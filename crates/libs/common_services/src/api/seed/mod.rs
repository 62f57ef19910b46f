pub mod error;
pub mod interfaces;
pub mod planner;
pub mod service;
