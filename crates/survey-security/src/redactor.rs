//! Mapping from a validated submission to a storage-safe record

use std::net::IpAddr;

use survey_core::{StoredSurveyRecord, SurveySubmission};
use time::{OffsetDateTime, UtcOffset};

use crate::digest::sha256_hex;

/// Request-scoped values the record needs besides the payload
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub received_at: OffsetDateTime,
    pub header_user_agent: Option<String>,
    pub forwarded_for: Option<String>,
    pub peer_addr: Option<IpAddr>,
}

impl RequestContext {
    pub fn new(received_at: OffsetDateTime) -> Self {
        Self {
            received_at,
            header_user_agent: None,
            forwarded_for: None,
            peer_addr: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.header_user_agent = Some(user_agent.into());
        self
    }

    pub fn with_forwarded_for(mut self, forwarded_for: impl Into<String>) -> Self {
        self.forwarded_for = Some(forwarded_for.into());
        self
    }

    pub fn with_peer_addr(mut self, peer_addr: IpAddr) -> Self {
        self.peer_addr = Some(peer_addr);
        self
    }
}

/// Build the record for an accepted submission.
///
/// Every stored field is listed explicitly; nothing is copied wholesale from
/// the submission. The plaintext email is only read to compute digests.
pub fn redact(submission: &SurveySubmission, context: &RequestContext) -> StoredSurveyRecord {
    let received_at = context.received_at.to_offset(UtcOffset::UTC);
    let email = submission.email().as_str();

    StoredSurveyRecord {
        name: submission.name().to_string(),
        email_sha256: sha256_hex(email),
        age_sha256: sha256_hex(&submission.age().to_string()),
        consent: submission.consent(),
        rating: submission.rating(),
        comments: submission.comments().unwrap_or_default().to_string(),
        user_agent: user_agent(submission, context),
        submission_id: submission_id(submission, email, received_at),
        received_at,
        ip: client_ip(context),
    }
}

/// `YYYYMMDDHH` of the instant in UTC
pub fn hour_key(at: OffsetDateTime) -> String {
    let at = at.to_offset(UtcOffset::UTC);
    format!(
        "{:04}{:02}{:02}{:02}",
        at.year(),
        u8::from(at.month()),
        at.day(),
        at.hour()
    )
}

fn submission_id(submission: &SurveySubmission, email: &str, received_at: OffsetDateTime) -> String {
    match submission.submission_id() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => sha256_hex(&format!("{}{}", email, hour_key(received_at))),
    }
}

fn user_agent(submission: &SurveySubmission, context: &RequestContext) -> Option<String> {
    submission
        .user_agent()
        .filter(|ua| !ua.is_empty())
        .or(context.header_user_agent.as_deref())
        .map(str::to_string)
}

fn client_ip(context: &RequestContext) -> String {
    match (&context.forwarded_for, context.peer_addr) {
        (Some(forwarded), _) if !forwarded.is_empty() => forwarded.clone(),
        (_, Some(peer)) => peer.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::DIGEST_HEX_LEN;
    use serde_json::{Value, json};
    use std::net::Ipv4Addr;
    use time::macros::datetime;

    fn submission(payload: Value) -> SurveySubmission {
        SurveySubmission::from_json(&payload).unwrap()
    }

    fn ann() -> SurveySubmission {
        submission(json!({
            "name": "Ann",
            "email": "ann@example.com",
            "age": 97,
            "consent": true,
            "rating": 5,
            "comments": "  great survey  "
        }))
    }

    fn context() -> RequestContext {
        RequestContext::new(datetime!(2024-03-01 14:05:09 UTC))
    }

    #[test]
    fn test_pii_is_hashed() {
        let record = redact(&ann(), &context());

        assert_eq!(record.email_sha256, sha256_hex("ann@example.com"));
        assert_eq!(record.age_sha256, sha256_hex("97"));
        assert_eq!(record.email_sha256.len(), DIGEST_HEX_LEN);
        assert_eq!(record.age_sha256.len(), DIGEST_HEX_LEN);
        assert_eq!(record.name, "Ann");
        assert_eq!(record.rating, 5);
        assert!(record.consent);
        assert_eq!(record.comments, "great survey");
    }

    #[test]
    fn test_serialized_record_has_no_plaintext_pii() {
        let record = redact(&ann(), &context());
        let json = serde_json::to_value(&record).unwrap();
        let text = json.to_string();

        assert!(!text.contains("ann@example.com"));

        let object = json.as_object().unwrap();
        assert!(!object.contains_key("email"));
        assert!(!object.contains_key("age"));
        assert!(object.values().all(|v| v != &json!(97) && v != &json!("97")));
    }

    #[test]
    fn test_missing_comments_stored_empty() {
        let record = redact(
            &submission(json!({
                "name": "Bo",
                "email": "bo@example.com",
                "age": 40,
                "consent": true,
                "rating": 3
            })),
            &context(),
        );
        assert_eq!(record.comments, "");
    }

    #[test]
    fn test_client_submission_id_used_verbatim() {
        let with_id = submission(json!({
            "name": "Ann",
            "email": "ann@example.com",
            "age": 30,
            "consent": true,
            "rating": 5,
            "submission_id": "client-key-42"
        }));

        assert_eq!(redact(&with_id, &context()).submission_id, "client-key-42");
    }

    #[test]
    fn test_empty_submission_id_is_derived() {
        let empty_id = submission(json!({
            "name": "Ann",
            "email": "ann@example.com",
            "age": 30,
            "consent": true,
            "rating": 5,
            "submission_id": ""
        }));

        assert_eq!(
            redact(&empty_id, &context()).submission_id,
            sha256_hex("ann@example.com2024030114")
        );
    }

    #[test]
    fn test_derived_submission_id_stable_within_hour() {
        let early = RequestContext::new(datetime!(2024-03-01 14:00:00 UTC));
        let late = RequestContext::new(datetime!(2024-03-01 14:59:59 UTC));
        let offset = RequestContext::new(datetime!(2024-03-01 16:30:00 +02:00));

        let id = redact(&ann(), &early).submission_id;
        assert_eq!(id, redact(&ann(), &late).submission_id);
        assert_eq!(id, redact(&ann(), &offset).submission_id);
        assert_eq!(id, sha256_hex("ann@example.com2024030114"));
    }

    #[test]
    fn test_derived_submission_id_changes_across_hour() {
        let before = RequestContext::new(datetime!(2024-03-01 14:59:59 UTC));
        let after = RequestContext::new(datetime!(2024-03-01 15:00:00 UTC));

        assert_ne!(
            redact(&ann(), &before).submission_id,
            redact(&ann(), &after).submission_id
        );
    }

    #[test]
    fn test_hour_key_format() {
        assert_eq!(hour_key(datetime!(2024-01-02 03:04:05 UTC)), "2024010203");
        assert_eq!(hour_key(datetime!(2024-01-01 01:30:00 +02:00)), "2023123123");
    }

    #[test]
    fn test_received_at_stored_in_utc() {
        let ctx = RequestContext::new(datetime!(2024-03-01 16:30:00 +02:00));
        let record = redact(&ann(), &ctx);

        assert_eq!(record.received_at, datetime!(2024-03-01 14:30:00 UTC));
        assert_eq!(record.received_at.offset(), UtcOffset::UTC);
    }

    #[test]
    fn test_user_agent_precedence() {
        let ctx = context().with_user_agent("curl/8.5.0");
        assert_eq!(redact(&ann(), &ctx).user_agent.as_deref(), Some("curl/8.5.0"));

        let override_ua = submission(json!({
            "name": "Ann",
            "email": "ann@example.com",
            "age": 30,
            "consent": true,
            "rating": 5,
            "user_agent": "SurveyKiosk/2.1"
        }));
        assert_eq!(
            redact(&override_ua, &ctx).user_agent.as_deref(),
            Some("SurveyKiosk/2.1")
        );

        assert_eq!(redact(&ann(), &context()).user_agent, None);
    }

    #[test]
    fn test_ip_precedence() {
        let peer = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5));

        let forwarded = context()
            .with_forwarded_for("203.0.113.7, 10.0.0.1")
            .with_peer_addr(peer);
        assert_eq!(redact(&ann(), &forwarded).ip, "203.0.113.7, 10.0.0.1");

        let empty_forwarded = context().with_forwarded_for("").with_peer_addr(peer);
        assert_eq!(redact(&ann(), &empty_forwarded).ip, "10.0.0.5");

        let peer_only = context().with_peer_addr(peer);
        assert_eq!(redact(&ann(), &peer_only).ip, "10.0.0.5");

        assert_eq!(redact(&ann(), &context()).ip, "");
    }
}
