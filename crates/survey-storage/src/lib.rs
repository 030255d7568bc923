//! Storage layer for survey records
//!
//! This crate provides:
//! - An append-only, newline-delimited JSON record log
//! - Platform default location for the log file

pub mod error;
pub mod record_log;

pub use error::{Result, StorageError};
pub use record_log::RecordLog;
