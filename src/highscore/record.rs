// Score record types module
// One leaderboard entry plus the coercion rules for incoming submissions

use serde::{Deserialize, Serialize};

/// Maximum stored name length in characters
pub const NAME_MAX: usize = 32;

/// One leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: i64,
}

/// Incoming submission payload with optional fields
///
/// Missing fields coerce to defaults. A `score` that is present but not an
/// integer fails deserialization and is rejected upstream as a client error.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub score: Option<i64>,
}

impl SubmitPayload {
    /// Coerce the payload into a stored record
    ///
    /// The name falls back to `placeholder` and is truncated to `NAME_MAX`
    /// characters; the score falls back to 0.
    pub fn into_record(self, placeholder: &str) -> ScoreRecord {
        let name = self.name.unwrap_or_else(|| placeholder.to_string());
        ScoreRecord {
            name: truncate_name(&name),
            score: self.score.unwrap_or(0),
        }
    }
}

/// Truncate a name to `NAME_MAX` characters on a char boundary
fn truncate_name(name: &str) -> String {
    if name.chars().count() <= NAME_MAX {
        name.to_string()
    } else {
        name.chars().take(NAME_MAX).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_coerces_to_defaults() {
        let record = SubmitPayload::default().into_record("Player");
        assert_eq!(record.name, "Player");
        assert_eq!(record.score, 0);
    }

    #[test]
    fn test_long_name_is_truncated() {
        let payload = SubmitPayload {
            name: Some("x".repeat(50)),
            score: Some(7),
        };
        let record = payload.into_record("Player");
        assert_eq!(record.name, "x".repeat(32));
        assert_eq!(record.score, 7);
    }

    #[test]
    fn test_short_name_is_kept_verbatim() {
        let payload = SubmitPayload {
            name: Some("Ann".to_string()),
            score: None,
        };
        let record = payload.into_record("Player");
        assert_eq!(record.name, "Ann");
        assert_eq!(record.score, 0);
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        let payload = SubmitPayload {
            name: Some("ö".repeat(40)),
            score: Some(1),
        };
        let record = payload.into_record("Player");
        assert_eq!(record.name.chars().count(), NAME_MAX);
    }

    #[test]
    fn test_non_numeric_score_fails_deserialization() {
        let result = serde_json::from_str::<SubmitPayload>(r#"{"name":"Ann","score":"abc"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_fields_deserialize_as_none() {
        let payload: SubmitPayload = serde_json::from_str("{}").expect("empty object is valid");
        assert!(payload.name.is_none());
        assert!(payload.score.is_none());
    }
}
