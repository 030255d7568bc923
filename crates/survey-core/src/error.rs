use serde::Serialize;
use thiserror::Error;

/// Machine-readable category of a field issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    Missing,
    Type,
    Length,
    Range,
    Email,
    Consent,
}

/// One violated constraint on one payload field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub code: IssueCode,
    pub issue: String,
}

impl FieldIssue {
    pub fn new(field: &'static str, code: IssueCode, issue: impl Into<String>) -> Self {
        Self {
            field,
            code,
            issue: issue.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Invalid body: {0}")]
    InvalidBody(String),

    #[error("Validation failed with {} issue(s)", .0.len())]
    Validation(Vec<FieldIssue>),
}

pub type Result<T> = std::result::Result<T, SubmissionError>;
