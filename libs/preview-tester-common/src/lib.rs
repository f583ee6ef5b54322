pub mod browser_use;
pub mod config;
pub mod error;
pub mod types;
