use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::UserRole;
use super::errors::TokenError;

/// Transport scheme prefix carried by every issued token.
pub const SCHEME_PREFIX: &str = "Bearer ";

/// Which lifetime a token was minted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    /// Stable name, used for registry keys and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// Builds and parses signed, expiring tokens.
///
/// The codec is the single source of truth for token *integrity*: a token
/// that passes [`TokenCodec::verify`] was signed by this process's key and
/// has not reached its embedded expiry. Whether it is still *authorized*
/// is the token registry's call, made by the service layer.
///
/// Uses HS256 with a symmetric key that arrives base64-encoded in
/// configuration and is decoded exactly once here.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    /// Create a codec from a base64-encoded symmetric secret.
    ///
    /// # Arguments
    /// * `secret_base64` - Signing key material, standard base64
    /// * `access_ttl` - Lifetime of access tokens
    /// * `refresh_ttl` - Lifetime of refresh tokens
    ///
    /// # Errors
    /// * `InvalidKey` - Secret is not valid base64 or decodes to fewer
    ///   than 32 bytes
    pub fn from_base64_secret(
        secret_base64: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, TokenError> {
        let secret = BASE64
            .decode(secret_base64.trim())
            .map_err(|e| TokenError::InvalidKey(e.to_string()))?;

        // HS256 needs at least 256 bits of key material
        if secret.len() < 32 {
            return Err(TokenError::InvalidKey(format!(
                "Secret too short: {} bytes, need at least 32",
                secret.len()
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
            algorithm: Algorithm::HS256,
            access_ttl,
            refresh_ttl,
        })
    }

    /// Lifetime configured for the given token kind.
    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    /// Mint a signed token, scheme prefix included.
    ///
    /// Claims are stamped with `iat = now` and `exp = now + ttl(kind)`;
    /// output is deterministic for identical inputs and `now`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Serialization or signing failed
    pub fn mint(
        &self,
        kind: TokenKind,
        user_id: &str,
        username: &str,
        nickname: &str,
        role: UserRole,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            nickname: nickname.to_string(),
            user_role: role,
            iat: now.timestamp(),
            exp: (now + self.ttl(kind)).timestamp(),
        };

        let jwt = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        Ok(format!("{}{}", SCHEME_PREFIX, jwt))
    }

    /// Verify signature integrity and expiry of a bare (scheme-stripped)
    /// token.
    ///
    /// Expiry is checked against the caller-supplied `now`, strictly:
    /// `now >= exp` is expired. The library's own wall-clock expiry check
    /// is disabled so the boundary stays exact and testable.
    ///
    /// # Errors
    /// * `Malformed` - Bad encoding or signature mismatch
    /// * `Expired` - `now` is at or past the embedded expiry
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| TokenError::Malformed(e.to_string()))?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }

    /// Strip the transport scheme prefix from a raw token value.
    ///
    /// # Errors
    /// * `MissingScheme` - Value is empty or does not start with the prefix
    pub fn strip_scheme(raw: &str) -> Result<&str, TokenError> {
        raw.strip_prefix(SCHEME_PREFIX)
            .filter(|rest| !rest.is_empty())
            .ok_or(TokenError::MissingScheme)
    }
}
