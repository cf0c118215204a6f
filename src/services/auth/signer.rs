use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use thiserror::Error;

/// Decoded contents of a verified token, keyed by claim name.
pub type Claims = serde_json::Map<String, serde_json::Value>;

/// Errors returned by `Signer::verify`.
///
/// The `Display` text is handed to clients as the Unauthorized description,
/// so it must never include key material or the token itself.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("access token is expired")]
    Expired,
    #[error("invalid access token: invalid audience claim")]
    InvalidAudience,
    #[error("invalid access token: invalid issuer claim")]
    InvalidIssuer,
    #[error("access token is invalid")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("signer is disabled")]
    Disabled,
}

impl From<jsonwebtoken::errors::Error> for SignerError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidAudience => Self::InvalidAudience,
            ErrorKind::InvalidIssuer => Self::InvalidIssuer,
            _ => Self::Invalid(e),
        }
    }
}

/// Cryptographic verifier for bearer tokens.
///
/// Shared across every request and connection, hence `Send + Sync`.
/// `enabled() == false` means authentication is switched off for the whole
/// process; callers must not call `verify` in that mode.
#[cfg_attr(test, mockall::automock)]
pub trait Signer: Send + Sync {
    fn enabled(&self) -> bool;

    fn verify(&self, token: &str) -> Result<Claims, SignerError>;
}

/// Claim checks applied on top of the signature check.
#[derive(Debug, Clone, Default)]
pub struct SignerOptions {
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway_seconds: u64,
}

/// `jsonwebtoken` backed signer.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtSigner {
    key: Option<(DecodingKey, Validation)>,
}

impl std::fmt::Debug for JwtSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSigner")
            .field("enabled", &self.enabled())
            .field("validation", &self.key.as_ref().map(|(_, v)| v))
            .finish()
    }
}

impl JwtSigner {
    /// Ed25519 public key (SPKI PEM), EdDSA tokens.
    pub fn from_ed_pem(
        public_key_pem: &str,
        options: SignerOptions,
    ) -> Result<Self, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_ed_pem(public_key_pem.as_bytes())?;
        Ok(Self::with_key(decoding_key, Algorithm::EdDSA, options))
    }

    /// Shared secret, HS256 tokens.
    pub fn from_secret(secret: &[u8], options: SignerOptions) -> Self {
        Self::with_key(DecodingKey::from_secret(secret), Algorithm::HS256, options)
    }

    /// No key configured: authentication is bypassed.
    pub fn disabled() -> Self {
        Self { key: None }
    }

    fn with_key(decoding_key: DecodingKey, algorithm: Algorithm, options: SignerOptions) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.leeway = options.leeway_seconds;

        if let Some(issuer) = options.issuer.as_deref() {
            validation.set_issuer(&[issuer]);
        }
        match options.audience.as_deref() {
            Some(audience) => validation.set_audience(&[audience]),
            // jsonwebtoken rejects any `aud` claim unless told which one to expect
            None => validation.validate_aud = false,
        }

        Self {
            key: Some((decoding_key, validation)),
        }
    }
}

impl Signer for JwtSigner {
    fn enabled(&self) -> bool {
        self.key.is_some()
    }

    fn verify(&self, token: &str) -> Result<Claims, SignerError> {
        let (decoding_key, validation) = self.key.as_ref().ok_or(SignerError::Disabled)?;
        let data = jsonwebtoken::decode::<Claims>(token, decoding_key, validation)?;
        Ok(data.claims)
    }
}
