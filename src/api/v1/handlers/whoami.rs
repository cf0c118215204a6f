/*
 * Responsibility
 * - GET /whoami (認証済み主体の確認用)
 * - access middleware を通過したリクエストのみ到達する
 */
use axum::Json;

use crate::api::v1::dto::whoami::WhoAmIResponse;
use crate::api::v1::extractors::AuthCtxExtractor;

pub async fn whoami(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<WhoAmIResponse> {
    Json(ctx.into())
}
