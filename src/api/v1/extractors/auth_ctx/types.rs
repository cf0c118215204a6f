/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは services::auth 側の責務
 */

use uuid::Uuid;

use crate::services::auth::Identity;

/// 認証を通過したリクエストに付与されるコンテキスト
///
/// - `identity` が `Identity::Bypassed` の場合、認証は無効化されている (認証済みではない)
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub identity: Identity,
}

impl AuthCtx {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn subject(&self) -> Option<Uuid> {
        self.identity.subject()
    }
}
