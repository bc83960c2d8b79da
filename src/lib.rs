pub mod api;
pub mod config;
pub mod error;
pub mod planner;
pub mod store;
pub mod test;
pub mod time;
pub mod utils;
