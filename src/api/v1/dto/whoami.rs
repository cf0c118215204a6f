use serde::Serialize;
use uuid::Uuid;

use crate::api::v1::extractors::AuthCtx;

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub subject: Option<Uuid>,
    pub bypassed: bool,
}

impl From<AuthCtx> for WhoAmIResponse {
    fn from(ctx: AuthCtx) -> Self {
        Self {
            subject: ctx.subject(),
            bypassed: ctx.identity.is_bypassed(),
        }
    }
}
