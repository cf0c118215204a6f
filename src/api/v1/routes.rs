/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は認証なし、/whoami は access middleware で保護
 * - /ws は handler 内で ConnectionAuth により判定 (401 は返さない)
 */
use axum::{Router, routing::get};

use crate::middleware;
use crate::state::AppState;

use crate::api::v1::handlers::{health::health, whoami::whoami, ws::ws};

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new().route("/whoami", get(whoami));
    let protected = middleware::auth::access::apply(protected, state);

    Router::new()
        .route("/health", get(health))
        .route("/ws", get(ws))
        .merge(protected)
}
