pub mod access;
pub mod catalog;
pub mod config;
pub mod database;
pub mod index;
pub mod storage;
pub mod trace;
pub mod transaction;

pub use config::EngineConfig;
pub use database::{Database, EngineError};
