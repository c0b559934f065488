//! Tagged response envelope shared by every portal API call.
//!
//! The backend wraps each response body as `{success, message, data, errors}`
//! with most fields optional. This crate owns the one normalization step from
//! that loose JSON into a strict internal shape, and the message extraction
//! policy views use to present failures.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};


/// Message presented when a failure envelope carries neither `message` nor `errors`.
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Separator used when `errors` entries are joined into a single message.
pub const ERRORS_SEPARATOR: &str = ", ";

/// Error returned by [`Envelope::parse`] and [`Success::decode`].
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The body is not JSON at all.
    #[error("response body is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    /// The body is JSON but not an object.
    #[error("response body is not a JSON object")]
    NotAnObject,
    /// The `success` tag is absent or not a boolean.
    #[error("response body is missing the boolean `success` tag")]
    MissingTag,
    /// A known field has the wrong JSON type.
    #[error("envelope field `{0}` has an unexpected type")]
    InvalidField(&'static str),
    /// The success payload does not match the requested type.
    #[error("failed to decode envelope data: {0}")]
    Data(#[source] serde_json::Error),
}

/// A normalized API response.
#[derive(Clone, Debug, PartialEq)]
pub enum Envelope {
    /// `success: true` with its (possibly null) payload.
    Success(Success),
    /// `success: false` with whatever diagnostics the server sent.
    Failure(Failure),
}

/// Payload of a successful envelope.
#[derive(Clone, Debug, PartialEq)]
pub struct Success {
    pub message: Option<String>,
    /// `Value::Null` when the server omitted `data`.
    pub data: Value,
}

/// Diagnostics of a failed envelope.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Failure {
    pub message: Option<String>,
    pub errors: Vec<String>,
}

impl Envelope {
    /// Parse and validate a raw response body.
    ///
    /// # Errors
    ///
    /// Returns an [`EnvelopeError`] when the body is not a JSON object, the
    /// `success` tag is missing, or `message`/`errors` have the wrong shape.
    pub fn parse(body: &[u8]) -> Result<Self, EnvelopeError> {
        let value: Value = serde_json::from_slice(body).map_err(EnvelopeError::Json)?;
        let Value::Object(mut map) = value else {
            return Err(EnvelopeError::NotAnObject);
        };

        let Some(Value::Bool(success)) = map.remove("success") else {
            return Err(EnvelopeError::MissingTag);
        };
        let message = take_message(&mut map)?;

        if success {
            let data = map.remove("data").unwrap_or(Value::Null);
            Ok(Self::Success(Success { message, data }))
        } else {
            let errors = take_errors(&mut map)?;
            Ok(Self::Failure(Failure { message, errors }))
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl Success {
    /// Decode the payload into a typed value. A missing payload decodes as
    /// JSON `null`, so mutations can decode into `()`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Data`] if the payload does not match `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, EnvelopeError> {
        serde_json::from_value(self.data).map_err(EnvelopeError::Data)
    }
}

impl Failure {
    /// User-facing message for this failure. See [`extract_message`].
    #[must_use]
    pub fn message(&self) -> String {
        extract_message(self.message.as_deref(), &self.errors)
    }
}

/// Pick the message to show for a failure: `message` when present and not
/// blank, otherwise the `errors` joined with [`ERRORS_SEPARATOR`], otherwise
/// [`DEFAULT_ERROR_MESSAGE`].
#[must_use]
pub fn extract_message(message: Option<&str>, errors: &[String]) -> String {
    if let Some(message) = message.filter(|m| !m.trim().is_empty()) {
        return message.to_owned();
    }
    if errors.is_empty() {
        return DEFAULT_ERROR_MESSAGE.to_owned();
    }
    errors.join(ERRORS_SEPARATOR)
}

fn take_message(map: &mut Map<String, Value>) -> Result<Option<String>, EnvelopeError> {
    match map.remove("message") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(message)) => Ok(Some(message)),
        Some(_) => Err(EnvelopeError::InvalidField("message")),
    }
}

/// `errors` entries are either plain strings or `{ "message": "..." }` objects.
fn take_errors(map: &mut Map<String, Value>) -> Result<Vec<String>, EnvelopeError> {
    let entries = match map.remove("errors") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(EnvelopeError::InvalidField("errors")),
    };

    entries
        .into_iter()
        .map(|entry| match entry {
            Value::String(text) => Ok(text),
            Value::Object(mut detail) => match detail.remove("message") {
                Some(Value::String(text)) => Ok(text),
                _ => Err(EnvelopeError::InvalidField("errors")),
            },
            _ => Err(EnvelopeError::InvalidField("errors")),
        })
        .collect()
}
