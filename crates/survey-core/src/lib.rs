//! Core domain models for the survey intake service
//!
//! This crate contains:
//! - The untrusted submission type and its schema check
//! - The storage-safe record type
//! - Validation error reporting

pub mod email;
pub mod error;
pub mod record;
pub mod submission;

pub use email::EmailAddress;
pub use error::{FieldIssue, IssueCode, Result, SubmissionError};
pub use record::StoredSurveyRecord;
pub use submission::SurveySubmission;
