//! PII redaction for survey submissions
//!
//! Turns a validated [`survey_core::SurveySubmission`] into a
//! [`survey_core::StoredSurveyRecord`] whose email and age are one-way
//! SHA-256 digests.

pub mod digest;
pub mod redactor;

pub use digest::sha256_hex;
pub use redactor::{RequestContext, hour_key, redact};
