//! Untrusted survey payload and its schema check

use serde_json::{Map, Value};

use crate::email::EmailAddress;
use crate::error::{FieldIssue, IssueCode, Result, SubmissionError};

pub const NAME_MAX_CHARS: usize = 100;
pub const COMMENTS_MAX_CHARS: usize = 1000;
pub const AGE_MIN: u8 = 13;
pub const AGE_MAX: u8 = 120;
pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;

/// A survey submission that passed every schema rule.
///
/// Only [`SurveySubmission::from_json`] builds one, so holding a value means
/// the payload was fully valid. Deliberately not `Serialize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveySubmission {
    name: String,
    email: EmailAddress,
    age: u8,
    consent: bool,
    rating: u8,
    comments: Option<String>,
    user_agent: Option<String>,
    submission_id: Option<String>,
}

impl SurveySubmission {
    /// Check a parsed JSON document against the submission schema.
    ///
    /// Every field is inspected and all issues are returned together.
    /// Unknown fields are ignored.
    pub fn from_json(payload: &Value) -> Result<Self> {
        let Some(object) = payload.as_object() else {
            return Err(SubmissionError::InvalidBody(format!(
                "expected a JSON object, got {}",
                json_type(payload)
            )));
        };

        let mut checker = Checker::new(object);

        let name = checker.text("name", 1, NAME_MAX_CHARS);
        let email = checker.email("email");
        let age = checker.integer("age", AGE_MIN, AGE_MAX);
        let consent = checker.consent("consent");
        let rating = checker.integer("rating", RATING_MIN, RATING_MAX);
        let comments = checker.comments("comments");
        let user_agent = checker.optional_text("user_agent");
        let submission_id = checker.optional_text("submission_id");

        match (
            name,
            email,
            age,
            consent,
            rating,
            comments,
            user_agent,
            submission_id,
        ) {
            (
                Some(name),
                Some(email),
                Some(age),
                Some(consent),
                Some(rating),
                Some(comments),
                Some(user_agent),
                Some(submission_id),
            ) if checker.issues.is_empty() => Ok(Self {
                name,
                email,
                age,
                consent,
                rating,
                comments,
                user_agent,
                submission_id,
            }),
            _ => Err(SubmissionError::Validation(checker.issues)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn consent(&self) -> bool {
        self.consent
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    /// Trimmed comments, if the client sent any
    pub fn comments(&self) -> Option<&str> {
        self.comments.as_deref()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn submission_id(&self) -> Option<&str> {
        self.submission_id.as_deref()
    }
}

/// Collects issues while pulling typed values out of the payload.
///
/// Each accessor returns `None` when it recorded an issue for its field.
struct Checker<'a> {
    object: &'a Map<String, Value>,
    issues: Vec<FieldIssue>,
}

impl<'a> Checker<'a> {
    fn new(object: &'a Map<String, Value>) -> Self {
        Self {
            object,
            issues: Vec::new(),
        }
    }

    fn report(&mut self, field: &'static str, code: IssueCode, issue: impl Into<String>) {
        self.issues.push(FieldIssue::new(field, code, issue));
    }

    /// Field value, with JSON `null` treated as absent
    fn get(&self, field: &str) -> Option<&'a Value> {
        self.object.get(field).filter(|value| !value.is_null())
    }

    fn required_str(&mut self, field: &'static str) -> Option<&'a str> {
        match self.get(field) {
            Some(Value::String(s)) => Some(s.as_str()),
            Some(_) => {
                self.report(field, IssueCode::Type, "must be a string");
                None
            }
            None => {
                self.report(field, IssueCode::Missing, "field required");
                None
            }
        }
    }

    fn text(&mut self, field: &'static str, min: usize, max: usize) -> Option<String> {
        let value = self.required_str(field)?;
        let len = value.chars().count();

        if len < min || len > max {
            self.report(
                field,
                IssueCode::Length,
                format!("must be between {min} and {max} characters"),
            );
            return None;
        }

        Some(value.to_string())
    }

    fn email(&mut self, field: &'static str) -> Option<EmailAddress> {
        let value = self.required_str(field)?;
        let email = EmailAddress::parse(value);

        if email.is_none() {
            self.report(field, IssueCode::Email, "must be a valid email address");
        }

        email
    }

    fn integer(&mut self, field: &'static str, min: u8, max: u8) -> Option<u8> {
        match self.get(field) {
            Some(Value::Number(n)) if !n.is_f64() => {
                match n.as_u64().and_then(|v| u8::try_from(v).ok()) {
                    Some(v) if (min..=max).contains(&v) => Some(v),
                    _ => {
                        self.report(
                            field,
                            IssueCode::Range,
                            format!("must be between {min} and {max}"),
                        );
                        None
                    }
                }
            }
            Some(_) => {
                self.report(field, IssueCode::Type, "must be an integer");
                None
            }
            None => {
                self.report(field, IssueCode::Missing, "field required");
                None
            }
        }
    }

    /// Consent is a business rule: anything but literal `true` fails the same way.
    fn consent(&mut self, field: &'static str) -> Option<bool> {
        match self.get(field) {
            Some(Value::Bool(true)) => Some(true),
            _ => {
                self.report(field, IssueCode::Consent, "consent must be true");
                None
            }
        }
    }

    fn comments(&mut self, field: &'static str) -> Option<Option<String>> {
        match self.get(field) {
            None => Some(None),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.chars().count() > COMMENTS_MAX_CHARS {
                    self.report(
                        field,
                        IssueCode::Length,
                        format!("must be at most {COMMENTS_MAX_CHARS} characters"),
                    );
                    return None;
                }
                Some(Some(trimmed.to_string()))
            }
            Some(_) => {
                self.report(field, IssueCode::Type, "must be a string");
                None
            }
        }
    }

    fn optional_text(&mut self, field: &'static str) -> Option<Option<String>> {
        match self.get(field) {
            None => Some(None),
            Some(Value::String(s)) => Some(Some(s.clone())),
            Some(_) => {
                self.report(field, IssueCode::Type, "must be a string");
                None
            }
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
