//! The single result handed to an invocation's callback

use serde::{Serialize, Serializer};

use crate::error::FetchError;

/// Exactly one of these is produced per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Raw response body.
    Success(String),
    Failure(FetchError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn into_result(self) -> Result<String, FetchError> {
        self.into()
    }
}

impl From<Result<String, FetchError>> for Outcome {
    fn from(result: Result<String, FetchError>) -> Self {
        match result {
            Ok(body) => Outcome::Success(body),
            Err(e) => Outcome::Failure(e),
        }
    }
}

impl From<Outcome> for Result<String, FetchError> {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success(body) => Ok(body),
            Outcome::Failure(e) => Err(e),
        }
    }
}

/// Success serializes as a bare string, failure as `{status, statusText}`,
/// so callers tell the two apart by payload shape.
impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Outcome::Success(body) => serializer.serialize_str(body),
            Outcome::Failure(e) => e.descriptor().serialize(serializer),
        }
    }
}
