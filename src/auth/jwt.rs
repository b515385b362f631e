use std::time::Duration;

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use super::claims::{Claims, TokenKind};
use crate::{config::JwtConfig, users::repo_types::User};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("token expired")]
    Expired,

    #[error("token has no subject")]
    MissingSubject,
}

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            access_ttl: Duration::from_secs(cfg.access_ttl_minutes.max(0) as u64 * 60),
            refresh_ttl: Duration::from_secs(cfg.refresh_ttl_minutes.max(0) as u64 * 60),
        }
    }
}

impl JwtKeys {
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    fn sign_with_kind(&self, user: &User, kind: TokenKind) -> Result<String, TokenError> {
        let now = OffsetDateTime::now_utc();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: user.email.clone(),
            iat: now.unix_timestamp(),
            exp: exp.unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            kind,
        };
        let token = self.encode_claims(&claims)?;
        debug!(user_id = user.id, kind = ?kind, "jwt signed");
        Ok(token)
    }

    pub(crate) fn encode_claims(&self, claims: &Claims) -> Result<String, TokenError> {
        Ok(encode(&Header::new(Algorithm::HS256), claims, &self.encoding)?)
    }

    pub fn sign_access(&self, user: &User) -> Result<String, TokenError> {
        self.sign_with_kind(user, TokenKind::Access)
    }

    pub fn sign_refresh(&self, user: &User) -> Result<String, TokenError> {
        self.sign_with_kind(user, TokenKind::Refresh)
    }

    /// Checks signature, issuer, audience and expiry.
    ///
    /// Expiry is a strict wall-clock comparison: a token stops being valid at
    /// `exp`, with no leeway for clock skew.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e),
            }
        })?;

        if OffsetDateTime::now_utc().unix_timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }
        debug!(kind = ?data.claims.kind, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    fn make_keys() -> JwtKeys {
        JwtKeys::from(&test_config().jwt)
    }

    fn user(email: &str) -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: 1,
            email: email.into(),
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
            is_active: true,
        }
    }

    fn claims_expiring_at(keys: &JwtKeys, exp: i64, sub: &str) -> Claims {
        Claims {
            sub: sub.into(),
            iat: exp - 60,
            exp,
            iss: keys.issuer.clone(),
            aud: keys.audience.clone(),
            kind: TokenKind::Access,
        }
    }

    #[test]
    fn sign_and_verify_access_token() {
        let keys = make_keys();
        let token = keys.sign_access(&user("a@x.com")).expect("sign access");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.subject().unwrap(), "a@x.com");
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn refresh_token_outlives_access_token() {
        let keys = make_keys();
        let u = user("a@x.com");
        let access = keys.verify(&keys.sign_access(&u).unwrap()).unwrap();
        let refresh = keys.verify(&keys.sign_refresh(&u).unwrap()).unwrap();
        assert_eq!(refresh.kind, TokenKind::Refresh);
        assert_eq!(refresh.subject().unwrap(), "a@x.com");
        assert!(refresh.exp > access.exp);
        assert_eq!(access.exp - access.iat, 5 * 60);
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = make_keys();
        let past = OffsetDateTime::now_utc().unix_timestamp() - 1;
        let token = keys
            .encode_claims(&claims_expiring_at(&keys, past, "a@x.com"))
            .unwrap();
        assert!(matches!(keys.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn token_is_invalid_at_its_expiry_instant() {
        let mut cfg = test_config().jwt;
        cfg.access_ttl_minutes = 0;
        let keys = JwtKeys::from(&cfg);
        let token = keys.sign_access(&user("a@x.com")).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_tampered_bytes() {
        let keys = make_keys();
        let token = keys.sign_access(&user("a@x.com")).unwrap();
        for (i, c) in token.char_indices() {
            if c == '.' {
                continue;
            }
            let replacement = if c == 'A' { 'B' } else { 'A' };
            let mut tampered = token.clone();
            tampered.replace_range(i..i + 1, &replacement.to_string());
            assert!(
                keys.verify(&tampered).is_err(),
                "tampering position {i} was accepted"
            );
        }
    }

    #[test]
    fn verify_rejects_other_secret() {
        let keys = make_keys();
        let mut cfg = test_config().jwt;
        cfg.secret = "another-secret".into();
        let other = JwtKeys::from(&cfg);
        let token = other.sign_access(&user("a@x.com")).unwrap();
        match keys.verify(&token) {
            Err(TokenError::Invalid(e)) => {
                assert!(matches!(e.kind(), ErrorKind::InvalidSignature))
            }
            other => panic!("expected invalid signature, got {other:?}"),
        }
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let good_keys = make_keys();
        let mut cfg = test_config().jwt;
        cfg.issuer = "bad-iss".into();
        cfg.audience = "bad-aud".into();
        let bad_keys = JwtKeys::from(&cfg);
        let token = good_keys.sign_access(&user("a@x.com")).unwrap();
        assert!(matches!(bad_keys.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn verify_rejects_garbage() {
        let keys = make_keys();
        assert!(keys.verify("not-a-token").is_err());
        assert!(keys.verify("").is_err());
    }

    #[test]
    fn subject_is_returned_verbatim() {
        let keys = make_keys();
        let future = OffsetDateTime::now_utc().unix_timestamp() + 300;
        let token = keys
            .encode_claims(&claims_expiring_at(&keys, future, " a@x.com "))
            .unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.subject().unwrap(), " a@x.com ");
    }

    #[test]
    fn blank_subject_is_reported() {
        let keys = make_keys();
        let future = OffsetDateTime::now_utc().unix_timestamp() + 300;
        let token = keys
            .encode_claims(&claims_expiring_at(&keys, future, "  "))
            .unwrap();
        let claims = keys.verify(&token).expect("signature is valid");
        assert!(matches!(claims.subject(), Err(TokenError::MissingSubject)));
    }
}
