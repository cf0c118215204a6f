/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - signer: 全リクエスト・全接続で共有する Signer
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::Signer;

#[derive(Clone)]
pub struct AppState {
    pub signer: Arc<dyn Signer>,
}

impl AppState {
    pub fn new(signer: Arc<dyn Signer>) -> Self {
        Self { signer }
    }
}
