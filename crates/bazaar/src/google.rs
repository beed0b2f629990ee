// Google ID-token verification. The service depends on the trait; the
// HTTP implementation asks Google's tokeninfo endpoint and checks that
// the token was minted for our client id.

use async_trait::async_trait;
use serde::Deserialize;

use bazaar_core::error::{ApiError, CommerceError, ErrorCode};

/// Identity asserted by a verified Google ID token.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    /// Google's stable subject id.
    pub sub: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
}

#[async_trait]
pub trait IdTokenVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<GoogleProfile, CommerceError>;
}

/// Verifier backed by `https://oauth2.googleapis.com/tokeninfo`.
#[derive(Debug, Clone)]
pub struct GoogleTokenVerifier {
    http: reqwest::Client,
    client_id: String,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

impl GoogleTokenVerifier {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: client_id.into(),
            endpoint: "https://oauth2.googleapis.com/tokeninfo".to_string(),
        }
    }

    /// Reads `GOOGLE_CLIENT_ID`; `None` disables Google login.
    pub fn from_env() -> Option<Self> {
        std::env::var("GOOGLE_CLIENT_ID").ok().map(Self::new)
    }
}

#[async_trait]
impl IdTokenVerifier for GoogleTokenVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleProfile, CommerceError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| CommerceError::Other(format!("tokeninfo request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ApiError::unauthorized(ErrorCode::GoogleVerificationFailed).into());
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| CommerceError::Other(format!("tokeninfo body malformed: {e}")))?;

        if info.aud != self.client_id {
            return Err(ApiError::unauthorized(ErrorCode::GoogleVerificationFailed).into());
        }

        Ok(GoogleProfile {
            sub: info.sub,
            email: info.email,
            name: info.name.unwrap_or_default(),
            picture: info.picture,
        })
    }
}
