pub mod auth;
pub mod config;
pub mod conversion;
pub mod handlers;
pub mod inputs;
pub mod managers;
pub mod models;
pub mod routes;
pub mod store;
pub mod utils;
pub mod validation;
pub mod views;
