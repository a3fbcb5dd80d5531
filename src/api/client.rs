use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::model::column;
use crate::model::note::Note;
use crate::model::target::Target;

/// Error type for backend calls.
///
/// `Application` and `Transport`/`Http` are handled identically by the sync
/// engine (the move is simply not committed); the split exists so the UI can
/// tell "you are offline" apart from "the server said no".
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned HTTP {status}")]
    Http { status: u16 },
    #[error("server error: {0}")]
    Application(String),
    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),
    #[error("invalid api base url: {0}")]
    BadBase(#[from] url::ParseError),
}

impl ApiError {
    /// True when the failure looks like lost connectivity rather than a
    /// server-side rejection.
    pub fn is_offline(&self) -> bool {
        match self {
            ApiError::Transport(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

/// The REST surface the board consumes. A trait seam so the sync engine and
/// the TUI can run against an in-memory fake in tests.
pub trait Backend: Send {
    fn fetch_targets(&self) -> Result<Vec<Target>, ApiError>;
    /// `status` may be given in any form (label or slug); the wire format is
    /// normalized to the hyphen-free label the backend stores.
    fn update_status(&self, organization: &str, status: &str) -> Result<(), ApiError>;
    fn fetch_notes(&self, organization: &str) -> Result<Vec<Note>, ApiError>;
    fn add_note(&self, target_id: &str, content: &str) -> Result<Note, ApiError>;
    fn delete_note(&self, id: i64) -> Result<(), ApiError>;
}

/// Blocking HTTP client for the board backend.
pub struct ApiClient {
    base: Url,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(api_base: &str) -> Result<Self, ApiError> {
        // A trailing slash matters for Url::join; normalize it away by
        // building paths with path_segments_mut instead.
        let base = Url::parse(api_base)?;
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(ApiClient { base, http })
    }

    /// Build `base/api/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::UnexpectedPayload("api base cannot be a base".into()))?;
            path.pop_if_empty();
            path.push("api");
            for s in segments {
                path.push(s);
            }
        }
        Ok(url)
    }

    /// Check the HTTP status and parse the body as JSON.
    fn parse_response(response: reqwest::blocking::Response) -> Result<Value, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }
        let text = response.text()?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| ApiError::UnexpectedPayload(format!("invalid json: {e}")))
    }

    /// Reject payloads carrying an application-level `{error: ...}` envelope.
    fn check_error_field(value: Value) -> Result<Value, ApiError> {
        if let Some(msg) = value.get("error").and_then(Value::as_str) {
            return Err(ApiError::Application(msg.to_string()));
        }
        Ok(value)
    }
}

impl Backend for ApiClient {
    fn fetch_targets(&self) -> Result<Vec<Target>, ApiError> {
        let url = self.endpoint(&["targets"])?;
        let value = Self::parse_response(self.http.get(url).send()?)?;
        if !value.is_array() {
            return Err(ApiError::UnexpectedPayload(
                "expected an array of targets".into(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| ApiError::UnexpectedPayload(format!("malformed target: {e}")))
    }

    fn update_status(&self, organization: &str, status: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["update_status"])?;
        let wire_status = column::wire_label(&column::slug(status));
        let body = serde_json::json!({
            "organization": organization,
            "status": wire_status,
        });
        let value = Self::parse_response(self.http.post(url).json(&body).send()?)?;
        Self::check_error_field(value)?;
        Ok(())
    }

    fn fetch_notes(&self, organization: &str) -> Result<Vec<Note>, ApiError> {
        let url = self.endpoint(&["notes", organization])?;
        let value = Self::parse_response(self.http.get(url).send()?)?;
        if !value.is_array() {
            // Error envelopes come back as objects here.
            Self::check_error_field(value)?;
            return Err(ApiError::UnexpectedPayload(
                "expected an array of notes".into(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| ApiError::UnexpectedPayload(format!("malformed note: {e}")))
    }

    fn add_note(&self, target_id: &str, content: &str) -> Result<Note, ApiError> {
        let url = self.endpoint(&["notes"])?;
        let body = serde_json::json!({
            "target_id": target_id,
            "content": content,
        });
        let value = Self::parse_response(self.http.post(url).json(&body).send()?)?;
        let value = Self::check_error_field(value)?;
        serde_json::from_value(value)
            .map_err(|e| ApiError::UnexpectedPayload(format!("malformed note: {e}")))
    }

    fn delete_note(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&["notes", &id.to_string()])?;
        let value = Self::parse_response(self.http.delete(url).send()?)?;
        Self::check_error_field(value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_rooted_at_api() {
        let client = ApiClient::new("http://localhost:5000").unwrap();
        assert_eq!(
            client.endpoint(&["targets"]).unwrap().as_str(),
            "http://localhost:5000/api/targets"
        );
    }

    #[test]
    fn path_segments_are_percent_encoded() {
        let client = ApiClient::new("http://localhost:5000").unwrap();
        let url = client.endpoint(&["notes", "Acme Corp & Sons"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/notes/Acme%20Corp%20&%20Sons"
        );
    }

    #[test]
    fn trailing_slash_in_base_is_harmless() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(
            client.endpoint(&["targets"]).unwrap().as_str(),
            "http://localhost:5000/api/targets"
        );
    }

    #[test]
    fn error_envelope_becomes_application_error() {
        let err =
            ApiClient::check_error_field(serde_json::json!({"error": "db locked"})).unwrap_err();
        assert!(matches!(err, ApiError::Application(m) if m == "db locked"));
    }

    #[test]
    fn success_envelope_passes_through() {
        let value = ApiClient::check_error_field(serde_json::json!({"success": true})).unwrap();
        assert_eq!(value["success"], true);
    }
}
