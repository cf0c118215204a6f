mod auth_ctx;
mod connection_auth;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use connection_auth::ConnectionAuth;
