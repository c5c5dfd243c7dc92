//! Session identity of one client run.

use std::fmt;

use cdc_feed_shared::{
    nickname::Nickname,
    protocol::NICKNAME_PARAM,
    time::Clock,
};

use crate::connection::{ConnectionState, Link};

/// Numeric token identifying this client for the lifetime of the process.
///
/// Taken from the wall clock once, when the session is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(i64);

impl ClientId {
    pub fn generate(clock: &dyn Clock) -> Self {
        Self(clock.now_millis())
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session context: who we are and where the connection stands
#[derive(Debug, Clone)]
pub struct Session {
    client_id: ClientId,
    nickname: Option<Nickname>,
    link: Link,
}

impl Session {
    pub fn new(client_id: ClientId) -> Self {
        Self {
            client_id,
            nickname: None,
            link: Link::default(),
        }
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn nickname(&self) -> Option<&Nickname> {
        self.nickname.as_ref()
    }

    pub fn state(&self) -> ConnectionState {
        self.link.state()
    }

    pub fn link(&self) -> Link {
        self.link
    }

    pub(crate) fn set_link(&mut self, link: Link) {
        self.link = link;
    }

    pub(crate) fn set_nickname(&mut self, nickname: Nickname) {
        self.nickname = Some(nickname);
    }

    pub(crate) fn clear_nickname(&mut self) {
        self.nickname = None;
    }

    /// Event channel URL for this session, or `None` before the handshake.
    ///
    /// The nickname travels URL-encoded in the query string so the backend can
    /// refuse it before any frame is exchanged.
    pub fn connection_url(&self, server_url: &str) -> Option<String> {
        let nickname = self.nickname.as_ref()?;
        Some(format!(
            "{}/ws/{}?{}={}",
            server_url.trim_end_matches('/'),
            self.client_id,
            NICKNAME_PARAM,
            urlencoding::encode(nickname.as_str())
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdc_feed_shared::{nickname::validate, time::FixedClock};

    #[test]
    fn test_client_id_comes_from_clock() {
        // テスト項目: クライアント ID は時計の値から生成される
        // given (前提条件):
        let clock = FixedClock::new(1700000000123);

        // when (操作):
        let client_id = ClientId::generate(&clock);

        // then (期待する結果):
        assert_eq!(client_id.value(), 1700000000123);
        assert_eq!(client_id.to_string(), "1700000000123");
    }

    #[test]
    fn test_new_session_is_idle_without_nickname() {
        // テスト項目: 新しいセッションは Idle でニックネームを持たない
        // given (前提条件):
        let client_id = ClientId::generate(&FixedClock::new(1));

        // when (操作):
        let session = Session::new(client_id);

        // then (期待する結果):
        assert_eq!(session.state(), ConnectionState::Idle);
        assert!(session.nickname().is_none());
        assert!(session.connection_url("ws://localhost:8000").is_none());
    }

    #[test]
    fn test_connection_url_encodes_nickname() {
        // テスト項目: 接続 URL にクライアント ID とエンコード済みニックネームが含まれる
        // given (前提条件):
        let mut session = Session::new(ClientId::generate(&FixedClock::new(42)));
        session.set_nickname(validate("Bruce Wayne").unwrap());

        // when (操作):
        let url = session.connection_url("ws://localhost:8000/");

        // then (期待する結果):
        assert_eq!(
            url.as_deref(),
            Some("ws://localhost:8000/ws/42?nickname=Bruce%20Wayne")
        );
    }

    #[test]
    fn test_clear_nickname() {
        // テスト項目: ニックネームをクリアすると URL が組み立てられなくなる
        // given (前提条件):
        let mut session = Session::new(ClientId::generate(&FixedClock::new(42)));
        session.set_nickname(validate("Oracle").unwrap());

        // when (操作):
        session.clear_nickname();

        // then (期待する結果):
        assert!(session.nickname().is_none());
        assert!(session.connection_url("ws://localhost:8000").is_none());
    }
}
