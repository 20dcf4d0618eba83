//! Invocation event.
//!
//! The HTTP-style trigger event handed to each function, in the camelCase
//! shape of an API gateway proxy event.

use std::collections::HashMap;
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ValidationError;

/// Request method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
    /// Non-standard `UPDATE` verb accepted by the update function.
    Update,
    /// Anything else, upper-cased.
    Other(String),
}

impl HttpMethod {
    /// Parse a method name, ignoring case.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            "UPDATE" => Self::Update,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether this method requests an update.
    #[must_use]
    pub const fn is_update(&self) -> bool {
        matches!(self, Self::Put | Self::Patch | Self::Update)
    }

    /// Canonical upper-case name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Update => "UPDATE",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound trigger event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEvent {
    /// Request method.
    #[serde(default)]
    pub http_method: String,
    /// Request headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// Query string parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_string_parameters: Option<HashMap<String, String>>,
    /// Body: a JSON value, or a string holding JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Whether a string body is base64 encoded.
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl HttpEvent {
    /// Event with `method` and nothing else.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            http_method: method.into(),
            ..Self::default()
        }
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a query string parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Parsed request method.
    #[must_use]
    pub fn method(&self) -> HttpMethod {
        HttpMethod::parse(&self.http_method)
    }

    /// Query string parameter `key`.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(key))
            .map(String::as_str)
    }

    /// Body as JSON.
    ///
    /// A string body is parsed as JSON text, after base64 decoding when
    /// `isBase64Encoded` is set.
    pub fn json_body(&self) -> Result<Value, ValidationError> {
        match &self.body {
            None | Some(Value::Null) => Err(ValidationError::MissingBody),
            Some(Value::String(text)) => {
                let bytes = if self.is_base64_encoded {
                    STANDARD
                        .decode(text.trim())
                        .map_err(|e| ValidationError::MalformedBody(e.to_string()))?
                } else {
                    text.clone().into_bytes()
                };
                if bytes.iter().all(u8::is_ascii_whitespace) {
                    return Err(ValidationError::MissingBody);
                }
                serde_json::from_slice(&bytes)
                    .map_err(|e| ValidationError::MalformedBody(e.to_string()))
            }
            Some(value) => Ok(value.clone()),
        }
    }
}
