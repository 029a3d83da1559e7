use std::fmt;

use serde_json::Value;

use crate::{error::{FireqlError, FireqlResult}, store::ValueKind};

/// Opaque service-account payload.
///
/// The only check made is that the blob is a JSON object; the raw text is
/// handed to the store unmodified.
#[derive(Clone, PartialEq)]
pub struct Credentials(String);

impl Credentials {
    pub fn from_json(raw: impl Into<String>) -> FireqlResult<Self> {
        let raw = raw.into();
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(_)) => Ok(Self(raw)),
            Ok(other) => {
                FireqlError::InvalidCredentials(format!("got a JSON {}", ValueKind::of_value(&other))).err()
            }
            Err(err) => FireqlError::InvalidCredentials(err.to_string()).err(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// keep secrets out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credentials({} bytes)", self.0.len())
    }
}
