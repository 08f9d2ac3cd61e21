//! Basic auth credential for the appointment service

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::HeaderValue;

/// A pre-encoded HTTP Basic token.
///
/// The service authenticates with an empty user name and the booking code
/// (Vermittlungscode) as password, so the token is `base64(":" + code)`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl Credential {
    /// Wrap an already base64-encoded `user:password` token.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into().trim().to_string(),
        }
    }

    /// Derive the token from a booking code.
    pub fn from_code(code: &str) -> Self {
        Self::from_user_password("", code)
    }

    pub fn from_user_password(user: &str, password: &str) -> Self {
        Self {
            token: STANDARD.encode(format!("{user}:{password}")),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// The value sent in the `Authorization` header.
    pub fn header_value(&self) -> Result<HeaderValue, reqwest::header::InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Basic {}", self.token))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential").field("token", &"<redacted>").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_booking_code() {
        let cred = Credential::from_code("VCGM-F87Z-Q7VZ");
        assert_eq!(cred.token(), "OlZDR00tRjg3Wi1RN1Za");
    }

    #[test]
    fn test_from_token_trims_whitespace() {
        let cred = Credential::from_token(" OlZDR00tRjg3Wi1RN1Za\n");
        assert_eq!(cred, Credential::from_code("VCGM-F87Z-Q7VZ"));
    }

    #[test]
    fn test_header_value() {
        let value = Credential::from_token("abc=").header_value().unwrap();
        assert_eq!(value.to_str().unwrap(), "Basic abc=");
        assert!(value.is_sensitive());
    }

    #[test]
    fn test_header_value_rejects_control_chars() {
        assert!(Credential::from_token("ab\u{7}c").header_value().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let dbg = format!("{:?}", Credential::from_token("secret"));
        assert!(!dbg.contains("secret"));
    }
}
