//! Wire envelope codec for the directory protocol.
//!
//! Requests arrive as URL-encoded `key=value&...` bodies; responses leave as
//! UTF-8 JSON objects carrying a mandatory `Result` discriminator. The codec
//! only reads and writes envelopes; the required `METHOD` key is the
//! dispatcher's concern.

use std::str;

use serde_json::{Map, Value};
use thiserror::Error;
use url::form_urlencoded;

/// Key of the success/failure discriminator in every response.
pub const RESULT_KEY: &str = "Result";
/// Key of the human-readable message attached to failures.
pub const MESSAGE_KEY: &str = "Message";

const RESULT_SUCCESS: &str = "Success";
const RESULT_FAILURE: &str = "Failure";

/// Decode failures for request bodies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// Body is not valid UTF-8 text.
    #[error("request body is not valid UTF-8")]
    NotText,
}

/// Ordered parameter mapping parsed from one request body. Ephemeral; never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestEnvelope {
    params: Vec<(String, String)>,
}

impl RequestEnvelope {
    /// Parse a URL-encoded body, trimming surrounding whitespace first.
    ///
    /// Values are always strings — no type inference. Repeated keys keep
    /// every occurrence; [`RequestEnvelope::get`] returns the first.
    pub fn decode(body: &[u8]) -> Result<Self, EnvelopeError> {
        let text = str::from_utf8(body).map_err(|_| EnvelopeError::NotText)?;
        let params = form_urlencoded::parse(text.trim().as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        Ok(Self { params })
    }

    /// First value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate parameters in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Number of parameters, repeated keys included.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True when the body carried no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Re-encode the parameters as a URL-encoded string.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.iter() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WireResult {
    Success,
    Failure,
}

impl WireResult {
    fn as_str(self) -> &'static str {
        match self {
            Self::Success => RESULT_SUCCESS,
            Self::Failure => RESULT_FAILURE,
        }
    }
}

/// Structured response document serialized back to the caller.
///
/// The discriminator lives outside the payload map and is written last, so
/// a payload field named `Result` can never clobber it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    result: WireResult,
    fields: Map<String, Value>,
}

impl ResponseEnvelope {
    /// A success envelope with no payload fields yet.
    pub fn success() -> Self {
        Self {
            result: WireResult::Success,
            fields: Map::new(),
        }
    }

    /// A failure envelope carrying `message` under [`MESSAGE_KEY`].
    pub fn failure(message: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(MESSAGE_KEY.to_owned(), Value::from(message.into()));
        Self {
            result: WireResult::Failure,
            fields,
        }
    }

    /// True when the envelope reports success.
    pub fn is_success(&self) -> bool {
        self.result == WireResult::Success
    }

    /// Insert or replace a payload field.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Builder-style [`ResponseEnvelope::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Merge a block of payload fields, replacing existing keys.
    pub fn extend(&mut self, fields: Map<String, Value>) {
        self.fields.extend(fields);
    }

    /// Serialize to UTF-8 JSON bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        let Self { result, mut fields } = self;
        fields.insert(RESULT_KEY.to_owned(), Value::from(result.as_str()));
        serde_json::to_vec(&Value::Object(fields))
            .unwrap_or_else(|_| br#"{"Result":"Failure"}"#.to_vec())
    }
}
