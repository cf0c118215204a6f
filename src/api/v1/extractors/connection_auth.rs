//! WebSocket 用の認証 extractor
//!
//! ハンドシェイク途中で 401 を返すことはできないため、結果を `bool` で handler に渡す。
//! `false` の場合、handler 側で Close frame を送って接続を閉じる。

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::services::auth::verify_connection;
use crate::state::AppState;

pub struct ConnectionAuth(pub bool);

impl FromRequestParts<AppState> for ConnectionAuth {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        Ok(ConnectionAuth(verify_connection(
            state.signer.as_ref(),
            authorization,
        )))
    }
}
