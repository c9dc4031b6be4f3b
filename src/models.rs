use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short code → long URL mapping, the only record the service stores.
///
/// Created once by the create handler; afterwards only `access_count` changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UrlMapping {
    pub short_url: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub access_count: i64,
}

impl UrlMapping {
    /// A fresh record stamped with the current time and a zero counter.
    pub fn new(short_url: impl Into<String>, long_url: impl Into<String>) -> Self {
        Self {
            short_url: short_url.into(),
            long_url: long_url.into(),
            created_at: Utc::now(),
            access_count: 0,
        }
    }
}

/// Body of `POST /`.
#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    pub long_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_wire_field_names() {
        let mapping = UrlMapping::new("abcd1234", "https://example.com");
        let json = serde_json::to_value(&mapping).unwrap();

        assert_eq!(json["short_url"], "abcd1234");
        assert_eq!(json["long_url"], "https://example.com");
        assert_eq!(json["access_count"], 0);
        assert!(json["created_at"].is_string());
    }

    #[test]
    fn create_request_requires_long_url() {
        assert!(serde_json::from_str::<CreateUrlRequest>(r#"{"url":"x"}"#).is_err());
        assert!(serde_json::from_str::<CreateUrlRequest>(r#"{"long_url":5}"#).is_err());

        let req: CreateUrlRequest =
            serde_json::from_str(r#"{"long_url":"not even a url","extra":true}"#).unwrap();
        assert_eq!(req.long_url, "not even a url");
    }
}
