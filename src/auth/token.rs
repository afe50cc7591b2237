use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::AuthError;
use crate::models::Role;

type HmacSha256 = Hmac<Sha256>;

/// What a bearer token asserts about its holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub roles: Vec<Role>,
    /// Expiry as a unix timestamp in seconds.
    pub exp: i64,
}

impl Claims {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Issues and checks `payload.signature` tokens, both parts base64url
/// encoded, signed with HMAC-SHA256.
#[derive(Clone)]
pub struct TokenSigner {
    key: Vec<u8>,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(key: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            key: key.into(),
            ttl,
        }
    }

    pub fn issue(&self, email: &str, roles: Vec<Role>) -> Result<String, AuthError> {
        self.issue_at(email, roles, Utc::now())
    }

    pub fn issue_at(
        &self,
        email: &str,
        roles: Vec<Role>,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Backend("token expiry is out of range".to_string()))?;
        let claims = Claims {
            email: email.to_string(),
            roles,
            exp: expires_at.timestamp(),
        };
        let payload =
            serde_json::to_vec(&claims).map_err(|e| AuthError::Backend(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(payload);

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{payload}.{signature}"))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let (payload, signature) = token
            .split_once('.')
            .ok_or_else(|| AuthError::InvalidToken("malformed token".to_string()))?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AuthError::InvalidToken("malformed signature".to_string()))?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidToken("bad signature".to_string()))?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AuthError::InvalidToken("malformed payload".to_string()))?;
        let claims: Claims = serde_json::from_slice(&payload)
            .map_err(|_| AuthError::InvalidToken("malformed claims".to_string()))?;

        if claims.exp <= now.timestamp() {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(&self.key).map_err(|e| AuthError::Backend(e.to_string()))
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0123456789abcdef0123456789abcdef";

    fn signer() -> TokenSigner {
        TokenSigner::new(KEY, Duration::days(100))
    }

    #[test]
    fn test_issued_token_verifies() {
        let token = signer()
            .issue("jane@example.com", vec![Role::Buyer])
            .unwrap();
        let claims = signer().verify(&token).unwrap();
        assert_eq!(claims.email, "jane@example.com");
        assert!(claims.has_role(Role::Buyer));
        assert!(!claims.has_role(Role::Admin));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let now = Utc::now();
        let token = signer()
            .issue_at("jane@example.com", vec![Role::Buyer], now)
            .unwrap();
        assert_eq!(
            signer().verify_at(&token, now + Duration::days(101)),
            Err(AuthError::TokenExpired)
        );
    }

    #[test]
    fn test_expiry_past_the_calendar_is_an_error() {
        let now = DateTime::<Utc>::MAX_UTC - Duration::days(1);
        let result = signer().issue_at("jane@example.com", vec![Role::Buyer], now);
        assert!(matches!(result, Err(AuthError::Backend(_))));

        let long_lived = TokenSigner::new(KEY, Duration::MAX);
        let result = long_lived.issue("jane@example.com", vec![]);
        assert!(matches!(result, Err(AuthError::Backend(_))));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let token = signer()
            .issue("jane@example.com", vec![Role::Buyer])
            .unwrap();
        let (_, signature) = token.split_once('.').unwrap();

        let forged = Claims {
            email: "jane@example.com".to_string(),
            roles: vec![Role::Admin],
            exp: i64::MAX,
        };
        let forged = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());
        let result = signer().verify(&format!("{forged}.{signature}"));
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_other_key_is_rejected() {
        let token = signer().issue("jane@example.com", vec![]).unwrap();
        let other = TokenSigner::new("another-key-another-key-another-k", Duration::days(1));
        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_garbage_is_rejected() {
        for token in ["", "no-dot", "a.b", "!!.??"] {
            assert!(
                matches!(signer().verify(token), Err(AuthError::InvalidToken(_))),
                "token {token:?}"
            );
        }
    }
}
