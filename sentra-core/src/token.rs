//! Bearer token signing and verification
//!
//! Sessions are stateless: a signed, time-bounded JWT binds the account's
//! internal identifier. Nothing is stored server-side, which means there is
//! no revocation — a leaked token remains valid until its `exp` claim.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{Error, account::AccountId, error::TokenError};

/// Claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject - the account's internal id
    pub sub: String,
    /// Issued at in seconds (as UTC timestamp)
    pub iat: i64,
    /// Expiration time in seconds (as UTC timestamp)
    pub exp: i64,
    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl TokenClaims {
    pub fn account_id(&self) -> AccountId {
        AccountId::new(&self.sub)
    }
}

/// Configuration for token signing: shared HS256 secret, expiry policy, and
/// an optional issuer claim.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    secret_key: Vec<u8>,
    /// The duration until issued tokens expire
    pub expires_in: Duration,
    /// Issuer claim
    pub issuer: Option<String>,
}

impl TokenConfig {
    /// Create a new token configuration with the given HS256 secret.
    pub fn new_hs256(secret_key: Vec<u8>) -> Self {
        Self {
            secret_key,
            expires_in: Duration::hours(24),
            issuer: None,
        }
    }

    /// Set the issuer claim
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Set the token expiry duration
    pub fn expires_in(mut self, duration: Duration) -> Self {
        self.expires_in = duration;
        self
    }

    /// Create a token configuration with a random secret (for testing)
    #[cfg(test)]
    pub fn new_random_hs256() -> Self {
        use rand::TryRngCore;

        let mut secret_key = vec![0u8; 32];
        rand::rngs::OsRng.try_fill_bytes(&mut secret_key).unwrap();
        Self::new_hs256(secret_key)
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.secret_key)
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.secret_key)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: the configured expiry is exact.
        validation.leeway = 0;
        validation
    }
}

/// A signed bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap an existing token string, e.g. one taken from an
    /// `Authorization: Bearer` header.
    pub fn new(token: &str) -> Self {
        AccessToken(token.to_string())
    }

    /// Sign a new token binding `account_id`, expiring after the configured
    /// duration.
    pub fn issue(account_id: &AccountId, config: &TokenConfig) -> Result<Self, Error> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: account_id.to_string(),
            iat: now.timestamp(),
            exp: (now + config.expires_in).timestamp(),
            iss: config.issuer.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &config.encoding_key())
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(AccessToken(token))
    }

    /// Verify the signature and expiry and return the claims.
    pub fn verify(&self, config: &TokenConfig) -> Result<TokenClaims, Error> {
        let token_data = decode::<TokenClaims>(&self.0, &config.decoding_key(), &config.validation())
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })?;

        // Belt and braces: the library already validated `exp`, but the
        // expiry contract matters enough to re-check it here.
        let claims = token_data.claims;
        let exp = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| TokenError::Invalid("Invalid exp claim".to_string()))?;
        if Utc::now() > exp {
            return Err(TokenError::Expired.into());
        }

        Ok(claims)
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccessToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccessToken {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
