//! Transport-specific wrappers over `resolve_identity`.
//!
//! Both take the raw `Authorization` header value. They differ only in how a
//! rejection is reported:
//! - request/response endpoints get the `Unauthorized` error and abort (401)
//! - persistent connections get a plain `bool` and close the socket themselves

use super::header::token_from_header;
use super::identity::{Identity, Unauthorized, resolve_identity};
use super::signer::Signer;

pub fn verify_request(
    signer: &dyn Signer,
    authorization: Option<&str>,
) -> Result<Identity, Unauthorized> {
    resolve_identity(signer, token_from_header(authorization))
}

/// Never fails: any rejection is reported as `false`.
///
/// The resolved identity is dropped here; connection handlers that need the
/// subject should call `verify_request` instead.
pub fn verify_connection(signer: &dyn Signer, authorization: Option<&str>) -> bool {
    verify_request(signer, authorization).is_ok()
}
