//! Storage-safe survey record

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One accepted submission as it is written to the log.
///
/// Shares no type with [`crate::SurveySubmission`]: email and age only
/// exist here as SHA-256 hex digests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSurveyRecord {
    pub name: String,
    pub email_sha256: String,
    pub age_sha256: String,
    pub consent: bool,
    pub rating: u8,
    #[serde(default)]
    pub comments: String,
    pub user_agent: Option<String>,
    pub submission_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub received_at: OffsetDateTime,
    pub ip: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample() -> StoredSurveyRecord {
        StoredSurveyRecord {
            name: "Ann".to_string(),
            email_sha256: "a".repeat(64),
            age_sha256: "b".repeat(64),
            consent: true,
            rating: 4,
            comments: String::new(),
            user_agent: None,
            submission_id: "sub-1".to_string(),
            received_at: datetime!(2024-03-01 14:05:09 UTC),
            ip: "203.0.113.7".to_string(),
        }
    }

    #[test]
    fn test_field_order_and_timestamp_format() {
        let json = serde_json::to_string(&sample()).unwrap();

        let keys = [
            "\"name\"",
            "\"email_sha256\"",
            "\"age_sha256\"",
            "\"consent\"",
            "\"rating\"",
            "\"comments\"",
            "\"user_agent\"",
            "\"submission_id\"",
            "\"received_at\"",
            "\"ip\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert!(json.contains("\"received_at\":\"2024-03-01T14:05:09Z\""));
        assert!(json.contains("\"user_agent\":null"));
    }

    #[test]
    fn test_reads_back_from_json() {
        let record = sample();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: StoredSurveyRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
