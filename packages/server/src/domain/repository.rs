//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use thiserror::Error;

use super::Participant;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Nickname already in use: {0}")]
    DuplicateNickname(String),
}

/// Participant Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// 参加者を追加（ニックネームが重複している場合はエラー）
    async fn add_participant(&self, participant: Participant) -> Result<(), RepositoryError>;

    /// 参加者を削除し、削除した参加者を返す
    async fn remove_participant(&self, key: &str) -> Option<Participant>;

    /// 接続中の参加者（接続順）
    async fn get_participants(&self) -> Vec<Participant>;

    /// 接続中の参加者数
    async fn count_participants(&self) -> usize;
}
