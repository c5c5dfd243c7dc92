//! Participant of the event channel.

use cdc_feed_shared::nickname::Nickname;

/// A connected client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Client identifier taken from the connection path
    pub client_id: String,
    /// Validated nickname, unique among connected participants
    pub nickname: Nickname,
    /// Unix timestamp of the connection (milliseconds)
    pub connected_at: i64,
}

impl Participant {
    pub fn new(client_id: String, nickname: Nickname, connected_at: i64) -> Self {
        Self {
            client_id,
            nickname,
            connected_at,
        }
    }

    /// Key identifying the participant's outbound channel
    pub fn key(&self) -> &str {
        self.nickname.as_str()
    }
}
