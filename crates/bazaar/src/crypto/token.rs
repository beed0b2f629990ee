// Stateless access tokens: HS256 JWTs carrying the user id and role.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use bazaar_core::db::models::Role;
use bazaar_core::error::CommerceError;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User id.
    pub sub: String,
    pub role: Role,
    pub iat: u64,
    pub exp: u64,
}

/// Issue an access token for a user.
pub fn sign_access_token(
    user_id: &str,
    role: Role,
    secret: &str,
    expires_in_secs: u64,
) -> Result<String, CommerceError> {
    let now = chrono::Utc::now().timestamp() as u64;
    let claims = AccessClaims {
        sub: user_id.to_string(),
        role,
        iat: now,
        exp: now + expires_in_secs,
    };

    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    jsonwebtoken::encode(&header, &claims, &key)
        .map_err(|e| CommerceError::Crypto(format!("Token signing failed: {e}")))
}

/// Verify and decode an access token. `None` on any failure (bad
/// signature, expired, malformed).
pub fn verify_access_token(token: &str, secret: &str) -> Option<AccessClaims> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    jsonwebtoken::decode::<AccessClaims>(token, &key, &validation)
        .ok()
        .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify() {
        let token = sign_access_token("u1", Role::User, "test-secret", 3600).unwrap();
        let claims = verify_access_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn wrong_secret_fails() {
        let token = sign_access_token("u1", Role::Admin, "correct", 3600).unwrap();
        assert!(verify_access_token(&token, "wrong").is_none());
    }

    #[test]
    fn garbage_token_fails() {
        assert!(verify_access_token("not-a-jwt", "secret").is_none());
    }
}
