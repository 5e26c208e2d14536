//! Request events and response envelopes exchanged with the handler.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};

use crate::constants::{
    CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS, CORS_ALLOW_ORIGIN, CORS_MAX_AGE_SECONDS,
};
use crate::error::SkinsError;

const JSON_CONTENT_TYPE: &str = "application/json";

// header names, in canonical case
const CONTENT_TYPE: &str = "Content-Type";
const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
const MAX_AGE: &str = "Access-Control-Max-Age";

fn default_method() -> String {
    "GET".to_owned()
}

/// An inbound request.
///
/// Also accepts the `httpMethod` / `queryStringParameters` names used by cloud function events.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RequestEvent {
    #[serde(default = "default_method", alias = "httpMethod")]
    pub(crate) method: String,
    #[serde(default, alias = "queryStringParameters")]
    pub(crate) query_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub(crate) body: Option<String>,
}

impl RequestEvent {
    pub(crate) fn new(method: impl Into<String>) -> Self {
        RequestEvent {
            method: method.into(),
            query_parameters: None,
            body: None,
        }
    }

    pub(crate) fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query_parameters
            .get_or_insert_with(HashMap::new)
            .insert(key.to_owned(), value.to_owned());
        self
    }

    pub(crate) fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// A non-empty query parameter.
    pub(crate) fn query(&self, key: &str) -> Option<&str> {
        self.query_parameters
            .as_ref()
            .and_then(|params| params.get(key))
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// The outbound response: status, headers and a serialized JSON body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResponseEnvelope {
    pub(crate) status_code: u16,
    pub(crate) headers: BTreeMap<String, String>,
    pub(crate) body: String,
    pub(crate) is_base64_encoded: bool,
}

impl ResponseEnvelope {
    fn with_body(status: StatusCode, body: String) -> Self {
        let headers = BTreeMap::from([
            (CONTENT_TYPE.to_owned(), JSON_CONTENT_TYPE.to_owned()),
            (
                ALLOW_ORIGIN.to_owned(),
                CORS_ALLOW_ORIGIN.to_owned(),
            ),
        ]);
        ResponseEnvelope {
            status_code: status.as_u16(),
            headers,
            body,
            is_base64_encoded: false,
        }
    }

    /// Serialize `value` as the JSON body.
    pub(crate) fn json<T: Serialize>(status: StatusCode, value: &T) -> Result<Self, SkinsError> {
        Ok(Self::with_body(status, serde_json::to_string(value)?))
    }

    /// An `{"error": message}` body.
    pub(crate) fn error(status: StatusCode, message: &str) -> Self {
        Self::with_body(status, json!({ "error": message }).to_string())
    }

    /// The answer to a CORS preflight request. Has an empty body.
    pub(crate) fn preflight() -> Self {
        let headers = BTreeMap::from([
            (
                ALLOW_ORIGIN.to_owned(),
                CORS_ALLOW_ORIGIN.to_owned(),
            ),
            (
                ALLOW_METHODS.to_owned(),
                CORS_ALLOW_METHODS.to_owned(),
            ),
            (
                ALLOW_HEADERS.to_owned(),
                CORS_ALLOW_HEADERS.to_owned(),
            ),
            (
                MAX_AGE.to_owned(),
                CORS_MAX_AGE_SECONDS.to_string(),
            ),
        ]);
        ResponseEnvelope {
            status_code: StatusCode::OK.as_u16(),
            headers,
            body: String::new(),
            is_base64_encoded: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_cloud_function_event() {
        let event: RequestEvent = serde_json::from_str(
            r#"{"httpMethod":"DELETE","queryStringParameters":{"id":"7"},"body":null}"#,
        )
        .unwrap();
        assert_eq!(event.method, "DELETE");
        assert_eq!(event.query("id"), Some("7"));
        assert_eq!(event.body, None);
    }

    #[test]
    fn method_defaults_to_get() {
        let event: RequestEvent = serde_json::from_str(r#"{"queryParameters":null}"#).unwrap();
        assert_eq!(event.method, "GET");
        assert_eq!(event.query("id"), None);
    }

    #[test]
    fn empty_query_parameter_is_absent() {
        let event = RequestEvent::new("GET").with_query("id", "");
        assert_eq!(event.query("id"), None);
    }

    #[test]
    fn error_envelope_is_json_with_cors_origin() {
        let envelope = ResponseEnvelope::error(StatusCode::NOT_FOUND, "Skin not found");
        assert_eq!(envelope.status_code, 404);
        assert_eq!(envelope.header("content-type"), Some("application/json"));
        assert_eq!(envelope.header("Access-Control-Allow-Origin"), Some("*"));
        let body: serde_json::Value = serde_json::from_str(&envelope.body).unwrap();
        assert_eq!(body, json!({ "error": "Skin not found" }));
    }

    #[test]
    fn preflight_advertises_methods_and_max_age() {
        let envelope = ResponseEnvelope::preflight();
        assert_eq!(envelope.status_code, 200);
        assert!(envelope.body.is_empty());
        assert_eq!(
            envelope.header("access-control-allow-methods"),
            Some("GET, POST, PUT, DELETE, OPTIONS")
        );
        assert_eq!(envelope.header("access-control-allow-headers"), Some("Content-Type"));
        assert_eq!(envelope.header("access-control-max-age"), Some("86400"));
    }

    #[test]
    fn envelope_serializes_with_camel_case_keys() {
        let envelope = ResponseEnvelope::error(StatusCode::BAD_REQUEST, "nope");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["statusCode"], 400);
        assert_eq!(value["isBase64Encoded"], false);
        assert_eq!(value["headers"]["Access-Control-Allow-Origin"], "*");
    }
}
