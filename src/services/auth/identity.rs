use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;
use uuid::Uuid;

use super::signer::{Signer, SignerError};

pub const INVALID_SUB_CLAIM: &str = "invalid sub claim";

/// The single authentication failure kind.
///
/// `token` is the credential that was rejected (empty when none was supplied).
/// It is kept for the caller's own use and is never rendered to clients or logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unauthorized: {description}")]
pub struct Unauthorized {
    pub token: String,
    pub description: String,
}

impl Unauthorized {
    pub fn new(token: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            description: description.into(),
        }
    }
}

/// Outcome of a successful authentication.
///
/// `Bypassed` is not an authenticated caller: it only means the signer is
/// disabled for the whole process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Subject(Uuid),
    Bypassed,
}

impl Identity {
    pub fn subject(&self) -> Option<Uuid> {
        match self {
            Self::Subject(id) => Some(*id),
            Self::Bypassed => None,
        }
    }

    pub fn is_bypassed(&self) -> bool {
        matches!(self, Self::Bypassed)
    }
}

/// Resolves a bearer credential into the caller's identity.
///
/// - signer disabled: `Identity::Bypassed`, `verify` is never called
/// - missing credential, failed verification or a `sub` that is not a UUID: `Unauthorized`
pub fn resolve_identity(
    signer: &dyn Signer,
    token: Option<&str>,
) -> Result<Identity, Unauthorized> {
    if !signer.enabled() {
        tracing::debug!("signer disabled, request is not authenticated");
        return Ok(Identity::Bypassed);
    }

    // Indistinguishable from a token the signer could not decode
    let Some(token) = token else {
        tracing::warn!("bearer token missing");
        let err = SignerError::Invalid(ErrorKind::InvalidToken.into());
        return Err(Unauthorized::new("", err.to_string()));
    };

    let claims = signer.verify(token).map_err(|err| {
        tracing::warn!(error = %err, "access token verification failed");
        Unauthorized::new(token, err.to_string())
    })?;

    let sub = claims
        .get("sub")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            tracing::warn!("access token has no sub claim");
            Unauthorized::new(token, INVALID_SUB_CLAIM)
        })?;

    let subject = Uuid::parse_str(sub).map_err(|err| {
        tracing::warn!(error = %err, "sub claim is not a uuid");
        Unauthorized::new(token, INVALID_SUB_CLAIM)
    })?;

    Ok(Identity::Subject(subject))
}
