//! Signed bearer token for the App Store Connect API

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use tracing::debug;

use crate::error::{ConnectError, Result};
use crate::types::Credentials;

/// Audience every App Store Connect token is issued for
pub const AUDIENCE: &str = "appstoreconnect-v1";

/// Token lifetime. The platform caps it at 20 minutes.
pub const TOKEN_LIFETIME_MINUTES: i64 = 20;

/// JWT claims for App Store Connect API
#[derive(Debug, Serialize, PartialEq, Eq)]
struct Claims {
    iss: String,
    iat: i64,
    exp: i64,
    aud: String,
}

impl Claims {
    fn new(issuer_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            iss: issuer_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(TOKEN_LIFETIME_MINUTES)).timestamp(),
            aud: AUDIENCE.to_string(),
        }
    }
}

/// A signed ES256 token. Generated once per process and never refreshed.
#[derive(Debug, Clone)]
pub struct AuthToken {
    token: String,
}

impl AuthToken {
    /// Read the private key file and sign a token with it
    pub fn generate(credentials: &Credentials) -> Result<Self> {
        let pem = match std::fs::read(&credentials.key_file) {
            Ok(pem) => pem,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConnectError::KeyFileNotFound(credentials.key_file.clone()));
            }
            Err(e) => return Err(ConnectError::Io(e)),
        };

        Self::from_pem(&credentials.key_id, &credentials.issuer_id, &pem)
    }

    /// Sign a token with an in-memory PEM key
    pub fn from_pem(key_id: &str, issuer_id: &str, pem: &[u8]) -> Result<Self> {
        let now = Utc::now();
        let claims = Claims::new(issuer_id, now);

        let encoding_key = EncodingKey::from_ec_pem(pem)
            .map_err(|e| ConnectError::InvalidCredentials(format!("Invalid API key: {}", e)))?;

        let mut header = Header::new(Algorithm::ES256);
        header.kid = Some(key_id.to_string());

        let token = encode(&header, &claims, &encoding_key)?;
        let expires_at = now + Duration::minutes(TOKEN_LIFETIME_MINUTES);
        debug!(key_id, %expires_at, "generated API token");

        Ok(Self { token })
    }

    /// Wrap an already-issued token
    pub fn from_static(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}
