//! Session token issuance and validation.
//!
//! A token is three dot-separated base64 segments: a header, a claims
//! payload, and a trailer tag. The trailer is a fixed placeholder, not a
//! cryptographic signature: tokens are not tamper-evident and must never
//! be treated as a security boundary.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuthResult;
use crate::users::{Role, User};

/// Token lifetime in hours.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Fixed trailer tag standing in for a signature.
const TRAILER_TAG: &str = "mentora-unsigned";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    typ: String,
    alg: String,
}

impl Header {
    fn session() -> Self {
        Self {
            typ: "session".to_string(),
            alg: "none".to_string(),
        }
    }
}

/// Claims carried in a token's payload segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Absolute expiry instant in epoch milliseconds.
    pub exp: i64,
}

/// Issues and validates session tokens.
#[derive(Debug, Clone)]
pub struct TokenService {
    ttl: Duration,
}

impl TokenService {
    /// Create a service issuing tokens with the standard 24 hour lifetime.
    pub fn new() -> Self {
        Self {
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    /// Create a service with a custom token lifetime.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Issue a token for a user. No side effects.
    pub fn issue(&self, user: &User) -> AuthResult<String> {
        let header = Header::session();
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            exp: (Utc::now() + self.ttl).timestamp_millis(),
        };

        let segments = [
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?),
            URL_SAFE_NO_PAD.encode(TRAILER_TAG),
        ];
        Ok(segments.join("."))
    }

    /// Decode the claims segment without checking expiry.
    ///
    /// Returns `None` for any string that does not have exactly three
    /// segments or whose claims segment is not well-formed.
    pub fn decode_claims(&self, token: &str) -> Option<Claims> {
        let mut segments = token.split('.');
        let (Some(_header), Some(claims), Some(_trailer), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return None;
        };

        let bytes = URL_SAFE_NO_PAD.decode(claims).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Validate a token. Fails closed: false for any string that is not
    /// exactly three segments, whose claims do not parse, or whose expiry
    /// is not strictly in the future. Never panics or errors.
    pub fn validate(&self, token: &str) -> bool {
        match self.decode_claims(token) {
            Some(claims) => claims.exp > Utc::now().timestamp_millis(),
            None => false,
        }
    }
}

impl Default for TokenService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::register("Ana Moreno", "ana@x.com", Role::Creator)
    }

    #[test]
    fn test_issue_then_validate() {
        let tokens = TokenService::new();
        let token = tokens.issue(&test_user()).unwrap();
        assert!(tokens.validate(&token));
    }

    #[test]
    fn test_issued_token_has_three_segments() {
        let tokens = TokenService::new();
        let token = tokens.issue(&test_user()).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_claims_round_trip() {
        let tokens = TokenService::new();
        let user = test_user();
        let token = tokens.issue(&user).unwrap();

        let claims = tokens.decode_claims(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, Role::Creator);
        assert!(claims.exp > Utc::now().timestamp_millis());
    }

    #[test]
    fn test_validate_rejects_wrong_segment_counts() {
        let tokens = TokenService::new();

        assert!(!tokens.validate(""));
        assert!(!tokens.validate("justonesegment"));
        assert!(!tokens.validate("two.segments"));
        assert!(!tokens.validate("a.b.c.d"));
        assert!(!tokens.validate("..."));
        assert!(!tokens.validate(".."));
    }

    #[test]
    fn test_validate_rejects_garbage_claims() {
        let tokens = TokenService::new();

        // Right shape, but the middle segment is not base64 JSON claims
        assert!(!tokens.validate("aaa.!!!.ccc"));
        assert!(!tokens.validate("aaa..ccc"));

        let not_claims = URL_SAFE_NO_PAD.encode(r#"{"unexpected":true}"#);
        assert!(!tokens.validate(&format!("aaa.{not_claims}.ccc")));
    }

    #[test]
    fn test_validate_rejects_expired_token() {
        // Issue a token that expired a millisecond ago
        let tokens = TokenService::with_ttl(Duration::milliseconds(-1));
        let token = tokens.issue(&test_user()).unwrap();

        assert!(!tokens.validate(&token));
        // The claims themselves still decode
        assert!(tokens.decode_claims(&token).is_some());
    }

    #[test]
    fn test_validate_rejects_token_with_extra_separator() {
        let tokens = TokenService::new();
        let token = tokens.issue(&test_user()).unwrap();

        assert!(!tokens.validate(&format!("{token}.extra")));
        assert!(!tokens.validate(&format!(".{token}")));
    }

    #[test]
    fn test_validate_is_total_over_odd_inputs() {
        let tokens = TokenService::new();

        for input in ["\0.\0.\0", "🦀.🦀.🦀", " . . ", "a.b.", ".b.c"] {
            assert!(!tokens.validate(input), "accepted {input:?}");
        }
    }
}
