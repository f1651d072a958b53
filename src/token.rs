use crate::model::User;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifetime of an issued token, in seconds.
pub const TOKEN_LIFETIME_SECS: i64 = 84_600;
pub const ISSUER: &str = "Api Movieflix";

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    #[serde(rename = "userId")]
    user_id: u64,
    name: String,
    iat: i64,
    exp: i64,
    iss: String,
}

/// Identity carried by a verified token.
#[derive(Debug, Clone, PartialEq)]
pub struct JwtUserData {
    pub id: u64,
    pub name: String,
    pub email: String,
}

impl fmt::Display for JwtUserData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> #{}", self.name, self.email, self.id)
    }
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        TokenService {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(&self, user: &User) -> jsonwebtoken::errors::Result<String> {
        self.issue_at(user, Utc::now().timestamp())
    }

    /// Signs a token as if issued at `now` (unix seconds).
    pub fn issue_at(&self, user: &User, now: i64) -> jsonwebtoken::errors::Result<String> {
        let claims = Claims {
            sub: user.email.clone(),
            user_id: user.id,
            name: user.name.clone(),
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
            iss: ISSUER.to_owned(),
        };
        encode(&Header::new(ALGORITHM), &claims, &self.encoding)
    }

    pub fn verify(&self, token: &str) -> Option<JwtUserData> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Checks signature, issuer and expiry against `now`. A token is valid
    /// strictly before its `exp`.
    pub fn verify_at(&self, token: &str, now: i64) -> Option<JwtUserData> {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked below against the supplied clock.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);

        let claims = match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => data.claims,
            Err(err) => {
                debug!("token rejected: {}", err);
                return None;
            }
        };
        if now >= claims.exp {
            debug!("token for {} expired at {}", claims.sub, claims.exp);
            return None;
        }
        Some(JwtUserData {
            id: claims.user_id,
            name: claims.name,
            email: claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn user() -> User {
        User {
            id: 7,
            name: "Ana".to_owned(),
            email: "ana@movieflix.com".to_owned(),
            password_hash: "irrelevant".to_owned(),
        }
    }

    #[test]
    fn verify_returns_issued_claims() {
        let tokens = TokenService::new("secret");
        let token = tokens.issue(&user()).unwrap();
        assert_eq!(
            tokens.verify(&token),
            Some(JwtUserData {
                id: 7,
                name: "Ana".to_owned(),
                email: "ana@movieflix.com".to_owned(),
            })
        );
    }

    #[test]
    fn other_secret_never_verifies() {
        let token = TokenService::new("secret").issue_at(&user(), NOW).unwrap();
        assert_eq!(TokenService::new("other").verify_at(&token, NOW), None);
    }

    #[test]
    fn expiry_is_exclusive() {
        let tokens = TokenService::new("secret");
        let token = tokens.issue_at(&user(), NOW).unwrap();
        assert!(tokens.verify_at(&token, NOW).is_some());
        assert!(tokens
            .verify_at(&token, NOW + TOKEN_LIFETIME_SECS - 1)
            .is_some());
        assert!(tokens.verify_at(&token, NOW + TOKEN_LIFETIME_SECS).is_none());
    }

    #[test]
    fn issuing_is_deterministic_for_a_fixed_clock() {
        let tokens = TokenService::new("secret");
        assert_eq!(
            tokens.issue_at(&user(), NOW).unwrap(),
            tokens.issue_at(&user(), NOW).unwrap()
        );
        assert_ne!(
            tokens.issue_at(&user(), NOW).unwrap(),
            tokens.issue_at(&user(), NOW + 1).unwrap()
        );
    }

    #[test]
    fn garbage_and_foreign_issuer_are_rejected() {
        let tokens = TokenService::new("secret");
        assert_eq!(tokens.verify_at("not.a.token", NOW), None);

        let foreign = Claims {
            sub: "ana@movieflix.com".to_owned(),
            user_id: 7,
            name: "Ana".to_owned(),
            iat: NOW,
            exp: NOW + TOKEN_LIFETIME_SECS,
            iss: "someone else".to_owned(),
        };
        let token = encode(
            &Header::new(ALGORITHM),
            &foreign,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert_eq!(tokens.verify_at(&token, NOW), None);
    }
}
