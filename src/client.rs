use crate::config::Config;
use crate::models::{CreateEntryPayload, EnergyData, NewEntry};
use chrono::{SecondsFormat, Utc};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{info, warn};

pub const SAVE_FAILED_MESSAGE: &str = "Could not save the entry";
pub const READ_ONLY_ENDPOINT_MESSAGE: &str = "This API is read-only. Set ENERGY_CREATE_ENTRY_URL to an endpoint that accepts POST requests.";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to load energy data")]
    Request(#[from] reqwest::Error),
    #[error("Failed to load energy data")]
    Status(StatusCode),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("{0}")]
    Transport(String),
}

impl SubmitError {
    pub fn status(&self) -> Option<u16> {
        match self {
            SubmitError::Rejected { status, .. } => Some(*status),
            SubmitError::Transport(_) => None,
        }
    }
}

/// Body of a write response. Malformed JSON is kept as text.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return ResponseBody::Empty;
        }
        match serde_json::from_str(text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text.to_string()),
        }
    }
}

/// Message shown to the user for a rejected write.
pub fn rejection_message(status: u16, text: &str) -> String {
    if status == StatusCode::METHOD_NOT_ALLOWED.as_u16() {
        return READ_ONLY_ENDPOINT_MESSAGE.to_string();
    }

    let message = match ResponseBody::parse(text) {
        ResponseBody::Json(Value::Object(map)) if map.contains_key("error") => match &map["error"] {
            Value::String(error) => error.clone(),
            other => other.to_string(),
        },
        _ => text.to_string(),
    };

    if message.trim().is_empty() {
        SAVE_FAILED_MESSAGE.to_string()
    } else {
        message
    }
}

#[derive(Clone)]
pub struct EnergyClient {
    http: Client,
    read_url: String,
    write_url: String,
}

impl EnergyClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self {
            http,
            read_url: config.read_url.clone(),
            write_url: config.write_url.clone(),
        })
    }

    pub async fn fetch(&self) -> Result<EnergyData, FetchError> {
        let response = self.http.get(&self.read_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, url = %self.read_url, "energy api returned an error status");
            return Err(FetchError::Status(status));
        }

        let data: EnergyData = response.json().await?;
        info!(entries = data.entries.len(), "fetched energy data");
        Ok(data)
    }

    pub async fn create_entry(&self, entry: &NewEntry) -> Result<ResponseBody, SubmitError> {
        let payload = CreateEntryPayload {
            score: entry.score,
            thoughts: entry.thoughts.clone(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        let response = self
            .http
            .post(&self.write_url)
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                message: rejection_message(status.as_u16(), &text),
            });
        }

        Ok(ResponseBody::parse(&text))
    }
}

fn transport_error(err: reqwest::Error) -> SubmitError {
    let message = err.to_string();
    if message.trim().is_empty() {
        SubmitError::Transport(SAVE_FAILED_MESSAGE.to_string())
    } else {
        SubmitError::Transport(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_not_allowed_gets_configuration_hint() {
        let message = rejection_message(405, r#"{"error":"Method not allowed"}"#);
        assert_eq!(message, READ_ONLY_ENDPOINT_MESSAGE);
    }

    #[test]
    fn error_field_wins_over_raw_text() {
        let message = rejection_message(400, r#"{"error":"score is required"}"#);
        assert_eq!(message, "score is required");
    }

    #[test]
    fn non_string_error_field_is_stringified() {
        let message = rejection_message(400, r#"{"error":{"code":7}}"#);
        assert_eq!(message, r#"{"code":7}"#);
    }

    #[test]
    fn raw_text_used_when_body_is_not_json() {
        let message = rejection_message(500, "upstream exploded");
        assert_eq!(message, "upstream exploded");
    }

    #[test]
    fn json_without_error_field_falls_back_to_text() {
        let message = rejection_message(500, r#"{"detail":"nope"}"#);
        assert_eq!(message, r#"{"detail":"nope"}"#);
    }

    #[test]
    fn empty_body_uses_generic_message() {
        assert_eq!(rejection_message(502, ""), SAVE_FAILED_MESSAGE);
        assert_eq!(rejection_message(502, "   "), SAVE_FAILED_MESSAGE);
    }

    #[test]
    fn response_body_never_fails_on_malformed_json() {
        assert_eq!(ResponseBody::parse(""), ResponseBody::Empty);
        assert_eq!(
            ResponseBody::parse("{not json"),
            ResponseBody::Text("{not json".into())
        );
        assert!(matches!(ResponseBody::parse(r#"{"ok":true}"#), ResponseBody::Json(_)));
    }

    #[test]
    fn fetch_errors_share_a_generic_message() {
        let err = FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to load energy data");
    }
}
