//! UseCase 層のエラー定義

use thiserror::Error;

use cdc_feed_shared::nickname::NicknameError;

/// 参加者接続のエラー
///
/// Display の文字列はそのまま WebSocket の close reason としてクライアントに届く。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("Invalid nickname: {0}")]
    InvalidNickname(#[from] NicknameError),

    #[error("Nickname '{0}' is already in use")]
    DuplicateNickname(String),
}
