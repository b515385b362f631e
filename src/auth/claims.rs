use serde::{Deserialize, Serialize};

use super::jwt::TokenError;

/// Type of JWT: access or refresh.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT payload used for authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,     // user email
    pub iat: i64,        // issued at (unix timestamp)
    pub exp: i64,        // expires at (unix timestamp)
    pub iss: String,     // issuer
    pub aud: String,     // audience
    pub kind: TokenKind, // token type
}

impl Claims {
    /// Email the token was issued for.
    pub fn subject(&self) -> Result<&str, TokenError> {
        if self.sub.trim().is_empty() {
            return Err(TokenError::MissingSubject);
        }
        Ok(&self.sub)
    }
}
