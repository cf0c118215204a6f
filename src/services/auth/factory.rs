/// Factory: build the process-wide `Signer` from `AuthConfig`.
use std::sync::Arc;

use crate::config::{AuthConfig, ConfigError, SignerKey};
use crate::services::auth::{JwtSigner, Signer, SignerOptions};

pub fn build_signer(config: &AuthConfig) -> Result<Arc<dyn Signer>, ConfigError> {
    let options = SignerOptions {
        issuer: config.issuer.clone(),
        audience: config.audience.clone(),
        leeway_seconds: config.leeway_seconds,
    };

    let signer = match &config.key {
        Some(SignerKey::EdPublicPem(pem)) => JwtSigner::from_ed_pem(pem, options).map_err(|e| {
            tracing::error!(error = %e, "failed to parse public key PEM (expected Ed25519 SPKI PEM)");
            ConfigError::Invalid("AUTH_PUBLIC_KEY_PEM")
        })?,
        Some(SignerKey::Secret(secret)) => JwtSigner::from_secret(secret.as_bytes(), options),
        None => {
            tracing::warn!("no signing key configured, authentication is DISABLED");
            JwtSigner::disabled()
        }
    };

    Ok(Arc::new(signer))
}
