pub mod alerts;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod repository;
pub mod validation;
