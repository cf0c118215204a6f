pub mod factory;
pub mod header;
pub mod identity;
pub mod signer;
pub mod verifier;

pub use factory::build_signer;
pub use identity::{Identity, Unauthorized};
pub use signer::{JwtSigner, Signer, SignerOptions};
pub use verifier::{verify_connection, verify_request};
