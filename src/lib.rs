pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod feed;
pub mod files;
pub mod seed;
pub mod telemetry;
pub mod token;
pub mod utils;
