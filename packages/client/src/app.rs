//! Client application context.
//!
//! [`App`] owns every piece of client state and is driven by [`AppEvent`]s from
//! one event loop. It never performs I/O itself: each call returns the
//! [`Command`]s the runner has to execute (open a socket, print a screen, arm a
//! timer, ...), which keeps the whole client testable without a network.

use std::{sync::Arc, time::Duration};

use cdc_feed_shared::time::{Clock, timestamp_to_local_time};

use crate::{
    config::ClientConfig,
    connection::{ConnectionState, Effect, LinkEvent, StatusIndicator, transition},
    event::{AppEvent, TransportEvent},
    handshake::Handshake,
    metrics::{Dashboard, DashboardFrame, MetricsSnapshot, PollControl},
    router::{DisplayMessage, Feed, check_submission},
    session::{ClientId, Session},
    view::{View, ViewController},
};

/// Number of feed entries replayed when returning to the feed view
pub const FEED_REPLAY_LIMIT: usize = 10;

/// Something the runner has to show
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Status indicator update
    Status {
        indicator: StatusIndicator,
        text: String,
    },
    /// Nickname prompt, with the inline error if any
    Handshake { error: Option<String> },
    /// One new feed entry; `count` is set for counted entries
    Message {
        message: DisplayMessage,
        count: Option<u64>,
    },
    /// The feed view: recent entries (newest first), or the placeholder
    Feed {
        recent: Vec<DisplayMessage>,
        placeholder: bool,
        total: u64,
    },
    /// A dashboard frame
    Dashboard(DashboardFrame),
    /// The dashboard was selected before any snapshot arrived
    DashboardPending,
    Help,
    Info(String),
}

/// Work requested from the runner
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Open the event channel at `url` for connection attempt `attempt`
    Open { url: String, attempt: u64 },
    /// Close the current event channel, if any
    Close,
    /// Send a text frame on the current event channel
    Send(String),
    /// Post [`AppEvent::ReconnectDue`] for `attempt` after `delay`
    ScheduleReconnect { attempt: u64, delay: Duration },
    Render(Screen),
    Quit,
}

/// The client application context
pub struct App<P: PollControl> {
    config: ClientConfig,
    clock: Arc<dyn Clock>,
    session: Session,
    handshake: Handshake,
    feed: Feed,
    views: ViewController<P>,
    dashboard: Dashboard,
}

impl<P: PollControl> App<P> {
    pub fn new(config: ClientConfig, clock: Arc<dyn Clock>, poller: P) -> Self {
        let session = Session::new(ClientId::generate(clock.as_ref()));
        let dashboard = Dashboard::new(config.chart_capacity);
        Self {
            config,
            clock,
            session,
            handshake: Handshake::default(),
            feed: Feed::new(),
            views: ViewController::new(poller),
            dashboard,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn handshake(&self) -> &Handshake {
        &self.handshake
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn active_view(&self) -> View {
        self.views.active()
    }

    pub fn poller(&self) -> &P {
        self.views.poller()
    }

    /// Begin the lifecycle: show the empty feed and the nickname prompt.
    ///
    /// A nickname given on the command line is submitted to the handshake as if
    /// it had been typed.
    pub fn start(&mut self) -> Vec<Command> {
        let mut commands = vec![Command::Render(self.feed_screen())];
        commands.extend(self.drive(LinkEvent::Start));

        if let Some(nickname) = self.config.nickname.clone() {
            commands.extend(self.submit_nickname(&nickname));
        }
        commands
    }

    /// React to one event
    pub fn handle(&mut self, event: AppEvent) -> Vec<Command> {
        match event {
            AppEvent::Input(line) => self.handle_input(&line),
            AppEvent::InputClosed => self.quit(),
            AppEvent::Transport { attempt, event } => self.handle_transport(attempt, event),
            AppEvent::ReconnectDue { attempt } => self.drive(LinkEvent::ReconnectDue { attempt }),
            AppEvent::MetricsPolled { generation, result } => match result {
                Ok(snapshot) => self.handle_snapshot(generation, snapshot),
                Err(e) => {
                    // Keep the last good snapshot on screen; the next tick retries.
                    tracing::debug!(generation, "Ignoring failed metrics poll: {}", e);
                    Vec::new()
                }
            },
        }
    }

    fn handle_input(&mut self, line: &str) -> Vec<Command> {
        let command = line.trim();
        match command {
            "/quit" => return self.quit(),
            "/help" => return vec![Command::Render(Screen::Help)],
            _ => {}
        }

        if self.session.state().expects_nickname() {
            return self.submit_nickname(line);
        }

        if let Some(name) = command.strip_prefix('/') {
            return self.handle_command(name);
        }

        self.submit_message(line)
    }

    fn handle_command(&mut self, name: &str) -> Vec<Command> {
        if let Some(view) = View::from_name(name) {
            return self.select_view(view);
        }

        match name {
            "nick" => self.drive(LinkEvent::IdentityChange),
            "help" => vec![Command::Render(Screen::Help)],
            _ => vec![Command::Render(Screen::Info(format!(
                "Unknown command: /{} (type /help)",
                name
            )))],
        }
    }

    fn submit_nickname(&mut self, raw: &str) -> Vec<Command> {
        match self.handshake.submit(raw) {
            Ok(nickname) => {
                tracing::info!("Nickname accepted: {}", nickname);
                self.session.set_nickname(nickname);
                self.drive(LinkEvent::NicknameAccepted)
            }
            Err(reason) => vec![Command::Render(Screen::Handshake {
                error: Some(reason.to_string()),
            })],
        }
    }

    fn submit_message(&mut self, text: &str) -> Vec<Command> {
        let now = self.clock.now_millis();
        match check_submission(text, self.session.state()) {
            Ok(text) => {
                let text = text.to_string();
                let message = self.feed.render_self(&text, now).clone();
                let count = self.feed.count();
                let mut commands = vec![Command::Send(text)];
                commands.extend(self.show_message(message, Some(count)));
                commands
            }
            Err(rejection) => {
                tracing::debug!("Submission refused: {}", rejection);
                let message = self.feed.notice(&rejection.to_string(), now).clone();
                self.show_message(message, None)
            }
        }
    }

    fn handle_transport(&mut self, attempt: u64, event: TransportEvent) -> Vec<Command> {
        match event {
            TransportEvent::Opened => self.drive(LinkEvent::Opened { attempt }),
            TransportEvent::Frame(text) => self.route_frame(attempt, &text),
            TransportEvent::Closed { code, reason } => {
                tracing::info!(attempt, code, "Connection closed: {}", reason);
                self.drive(LinkEvent::Closed {
                    attempt,
                    code,
                    reason,
                })
            }
            TransportEvent::Error(message) => {
                tracing::warn!(attempt, "Connection error: {}", message);
                self.drive(LinkEvent::TransportError { attempt })
            }
        }
    }

    fn route_frame(&mut self, attempt: u64, text: &str) -> Vec<Command> {
        let link = self.session.link();
        if attempt != link.attempt() || link.state() != ConnectionState::Connected {
            tracing::debug!(attempt, "Dropping frame from a stale or unopened connection");
            return Vec::new();
        }

        let now = self.clock.now_millis();
        let message = self.feed.render_inbound(text, now).clone();
        let count = self.feed.count();
        self.show_message(message, Some(count))
    }

    fn handle_snapshot(&mut self, generation: u64, snapshot: MetricsSnapshot) -> Vec<Command> {
        if !self.views.poller().is_current(generation) {
            tracing::debug!(generation, "Dropping metrics from a stopped poll");
            return Vec::new();
        }

        let label = timestamp_to_local_time(self.clock.now_millis());
        let frame = self.dashboard.apply(snapshot, label);
        if self.views.active() == View::Dashboard {
            vec![Command::Render(Screen::Dashboard(frame))]
        } else {
            Vec::new()
        }
    }

    fn select_view(&mut self, view: View) -> Vec<Command> {
        if !self.views.select(view) {
            return Vec::new();
        }

        let screen = match view {
            View::Feed => self.feed_screen(),
            View::Dashboard => match self.dashboard.frame() {
                Some(frame) => Screen::Dashboard(frame),
                None => Screen::DashboardPending,
            },
        };
        vec![Command::Render(screen)]
    }

    fn quit(&mut self) -> Vec<Command> {
        self.views.shutdown();
        vec![Command::Close, Command::Quit]
    }

    /// Feed the state machine and translate its effects into commands
    fn drive(&mut self, event: LinkEvent) -> Vec<Command> {
        let transition = transition(self.session.link(), &event);
        if transition.link.state() != self.session.state() {
            tracing::debug!(
                from = ?self.session.state(),
                to = ?transition.link.state(),
                attempt = transition.link.attempt(),
                "Connection state changed"
            );
        }
        self.session.set_link(transition.link);

        let mut commands = Vec::new();
        for effect in transition.effects {
            commands.extend(self.apply(effect));
        }
        commands
    }

    fn apply(&mut self, effect: Effect) -> Vec<Command> {
        match effect {
            Effect::Status { indicator, text } => {
                vec![Command::Render(Screen::Status { indicator, text })]
            }
            Effect::Notice(text) => {
                let message = self.feed.notice(&text, self.clock.now_millis()).clone();
                self.show_message(message, None)
            }
            Effect::ShowHandshake { error } => {
                // A new handshake cycle always starts without a nickname.
                self.session.clear_nickname();
                self.handshake.open(error.clone());
                vec![Command::Render(Screen::Handshake { error })]
            }
            Effect::Open { attempt } => {
                match self.session.connection_url(&self.config.server_url) {
                    Some(url) => vec![Command::Open { url, attempt }],
                    None => {
                        tracing::error!(attempt, "Cannot open a connection without a nickname");
                        Vec::new()
                    }
                }
            }
            Effect::Close => vec![Command::Close],
            Effect::ScheduleReconnect { attempt } => vec![Command::ScheduleReconnect {
                attempt,
                delay: self.config.reconnect_delay,
            }],
        }
    }

    /// Entries are shown immediately on the feed; otherwise they wait for the replay.
    fn show_message(&self, message: DisplayMessage, count: Option<u64>) -> Vec<Command> {
        if self.views.active() == View::Feed {
            vec![Command::Render(Screen::Message { message, count })]
        } else {
            Vec::new()
        }
    }

    fn feed_screen(&self) -> Screen {
        Screen::Feed {
            recent: self.feed.recent(FEED_REPLAY_LIMIT),
            placeholder: self.feed.has_placeholder(),
            total: self.feed.count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        connection::CONNECTION_LOST_NOTICE,
        error::MetricsError,
        metrics::dashboard::{TILE_CONNECTED_USERS, TILE_THROUGHPUT, TILE_UPTIME},
        router::Category,
        view::tests::RecordingPoller,
    };
    use cdc_feed_shared::{
        metrics::OperationCounts,
        protocol::{ABNORMAL_CLOSURE, POLICY_VIOLATION},
        time::FixedClock,
    };

    const NOW: i64 = 1_700_000_000_000;

    fn app() -> App<RecordingPoller> {
        App::new(
            ClientConfig::new("ws://example.test", "http://example.test/api/metrics"),
            Arc::new(FixedClock::new(NOW)),
            RecordingPoller::default(),
        )
    }

    fn input(app: &mut App<RecordingPoller>, line: &str) -> Vec<Command> {
        app.handle(AppEvent::Input(line.to_string()))
    }

    fn transport(app: &mut App<RecordingPoller>, attempt: u64, event: TransportEvent) -> Vec<Command> {
        app.handle(AppEvent::Transport { attempt, event })
    }

    fn connected(nickname: &str) -> App<RecordingPoller> {
        let mut app = app();
        app.start();
        input(&mut app, nickname);
        transport(&mut app, 1, TransportEvent::Opened);
        assert_eq!(app.session().state(), ConnectionState::Connected);
        app
    }

    fn opened(commands: &[Command]) -> Vec<(String, u64)> {
        commands
            .iter()
            .filter_map(|command| match command {
                Command::Open { url, attempt } => Some((url.clone(), *attempt)),
                _ => None,
            })
            .collect()
    }

    fn rendered_messages(commands: &[Command]) -> Vec<(DisplayMessage, Option<u64>)> {
        commands
            .iter()
            .filter_map(|command| match command {
                Command::Render(Screen::Message { message, count }) => {
                    Some((message.clone(), *count))
                }
                _ => None,
            })
            .collect()
    }

    fn snapshot(create: u64) -> MetricsSnapshot {
        MetricsSnapshot {
            connected_users: 1,
            active_nicknames: vec!["Nightwing".to_string()],
            cdc_events: OperationCounts {
                create,
                update: 0,
                delete: 0,
            },
            ..MetricsSnapshot::default()
        }
    }

    #[test]
    fn test_start_shows_placeholder_and_handshake() {
        // テスト項目: 起動時にプレースホルダー付きのフィードとニックネーム入力が表示される
        // given (前提条件):
        let mut app = app();

        // when (操作):
        let commands = app.start();

        // then (期待する結果):
        assert!(matches!(
            &commands[0],
            Command::Render(Screen::Feed { placeholder: true, total: 0, .. })
        ));
        assert!(commands.contains(&Command::Render(Screen::Handshake { error: None })));
        assert!(opened(&commands).is_empty());
        assert!(app.handshake().is_open());
        assert_eq!(app.session().state(), ConnectionState::AwaitingNickname);
    }

    #[test]
    fn test_no_connection_before_valid_nickname() {
        // テスト項目: 有効なニックネームが送信されるまで接続は試行されない
        // given (前提条件):
        let mut app = app();
        app.start();

        // when (操作):
        let commands = input(&mut app, "x");

        // then (期待する結果):
        assert!(opened(&commands).is_empty());
        assert_eq!(
            commands,
            vec![Command::Render(Screen::Handshake {
                error: Some("too short".to_string())
            })]
        );
        assert_eq!(app.handshake().error(), Some("too short"));
        assert_eq!(app.session().state(), ConnectionState::AwaitingNickname);
    }

    #[test]
    fn test_nickname_from_config_connects() {
        // テスト項目: 設定で与えたニックネームは起動時に検証され接続が開始される
        // given (前提条件):
        let mut app = App::new(
            ClientConfig::new("ws://example.test", "http://example.test/api/metrics")
                .with_nickname(Some("Oracle".to_string())),
            Arc::new(FixedClock::new(NOW)),
            RecordingPoller::default(),
        );

        // when (操作):
        let commands = app.start();

        // then (期待する結果):
        assert_eq!(
            opened(&commands),
            vec![(format!("ws://example.test/ws/{}?nickname=Oracle", NOW), 1)]
        );
    }

    #[test]
    fn test_inbound_frame_is_classified_and_counted() {
        // テスト項目: 受信メッセージが分類され、件数が増えプレースホルダーが消える
        // given (前提条件):
        let mut app = connected("Nightwing");

        // when (操作):
        let commands = transport(
            &mut app,
            1,
            TransportEvent::Frame("SuperHero [Deleted]: {'id': 3}".to_string()),
        );

        // then (期待する結果):
        let messages = rendered_messages(&commands);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0.category, Category::Delete);
        assert_eq!(messages[0].0.timestamp, NOW);
        assert_eq!(messages[0].1, Some(1));
        assert!(!app.feed().has_placeholder());
    }

    #[test]
    fn test_frame_from_stale_attempt_is_dropped() {
        // テスト項目: 過去の接続試行から届いたフレームは破棄される
        // given (前提条件):
        let mut app = connected("Nightwing");
        transport(
            &mut app,
            1,
            TransportEvent::Closed {
                code: ABNORMAL_CLOSURE,
                reason: String::new(),
            },
        );
        app.handle(AppEvent::ReconnectDue { attempt: 1 });

        // when (操作):
        let commands = transport(&mut app, 1, TransportEvent::Frame("late".to_string()));

        // then (期待する結果):
        assert!(commands.is_empty());
        assert_eq!(app.feed().count(), 0);
    }

    #[test]
    fn test_send_requires_connection() {
        // テスト項目: 未接続時の送信は拒否され、通知が表示される
        // given (前提条件):
        let mut app = app();
        app.start();
        input(&mut app, "Nightwing");

        // when (操作):
        let commands = input(&mut app, "hello");

        // then (期待する結果):
        assert!(!commands.iter().any(|c| matches!(c, Command::Send(_))));
        let messages = rendered_messages(&commands);
        assert_eq!(
            messages[0].0.text,
            "Cannot send message: Not connected to server"
        );
        assert_eq!(messages[0].0.category, Category::System);
        assert_eq!(app.feed().count(), 0);
    }

    #[test]
    fn test_send_when_connected_echoes_locally() {
        // テスト項目: 接続中の送信はそのまま送られ、自分のメッセージとして表示される
        // given (前提条件):
        let mut app = connected("Nightwing");

        // when (操作):
        let commands = input(&mut app, " hi there ");

        // then (期待する結果):
        assert_eq!(commands[0], Command::Send(" hi there ".to_string()));
        let messages = rendered_messages(&commands);
        assert_eq!(messages[0].0.text, "You:  hi there ");
        assert_eq!(messages[0].0.category, Category::SelfAuthored);
        assert_eq!(messages[0].1, Some(1));
    }

    #[test]
    fn test_empty_submission_is_refused() {
        // テスト項目: 空白のみの送信は拒否される
        // given (前提条件):
        let mut app = connected("Nightwing");

        // when (操作):
        let commands = input(&mut app, "   ");

        // then (期待する結果):
        assert!(!commands.iter().any(|c| matches!(c, Command::Send(_))));
        assert_eq!(
            rendered_messages(&commands)[0].0.text,
            "Cannot send an empty message"
        );
    }

    #[test]
    fn test_abnormal_close_schedules_reconnect() {
        // テスト項目: 異常終了では 3 秒後の再接続が予約される
        // given (前提条件):
        let mut app = connected("Nightwing");

        // when (操作):
        let commands = transport(
            &mut app,
            1,
            TransportEvent::Closed {
                code: ABNORMAL_CLOSURE,
                reason: String::new(),
            },
        );

        // then (期待する結果):
        assert!(commands.contains(&Command::ScheduleReconnect {
            attempt: 1,
            delay: Duration::from_secs(3),
        }));
        assert_eq!(rendered_messages(&commands)[0].0.text, CONNECTION_LOST_NOTICE);
        assert_eq!(app.session().state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_policy_close_reopens_handshake() {
        // テスト項目: 1008 で閉じられると再接続せず、理由付きでニックネーム入力に戻る
        // given (前提条件):
        let mut app = connected("Nightwing");

        // when (操作):
        let commands = transport(
            &mut app,
            1,
            TransportEvent::Closed {
                code: POLICY_VIOLATION,
                reason: "Nickname already in use".to_string(),
            },
        );

        // then (期待する結果):
        assert!(!commands
            .iter()
            .any(|c| matches!(c, Command::ScheduleReconnect { .. })));
        assert!(commands.contains(&Command::Render(Screen::Handshake {
            error: Some("Nickname already in use".to_string())
        })));
        assert_eq!(app.session().state(), ConnectionState::RejectedByServer);
        assert!(app.session().nickname().is_none());

        // when (操作): 別のニックネームで再試行
        let commands = input(&mut app, "Red Hood");

        // then (期待する結果):
        assert_eq!(
            opened(&commands),
            vec![(format!("ws://example.test/ws/{}?nickname=Red%20Hood", NOW), 2)]
        );
    }

    #[test]
    fn test_transport_error_then_close_reconnects_once() {
        // テスト項目: エラーの後に閉じられた場合、再接続は 1 回だけ予約される
        // given (前提条件):
        let mut app = connected("Nightwing");

        // when (操作):
        let mut commands = transport(&mut app, 1, TransportEvent::Error("reset".to_string()));
        commands.extend(transport(
            &mut app,
            1,
            TransportEvent::Closed {
                code: ABNORMAL_CLOSURE,
                reason: String::new(),
            },
        ));
        commands.extend(app.handle(AppEvent::ReconnectDue { attempt: 1 }));
        commands.extend(app.handle(AppEvent::ReconnectDue { attempt: 1 }));

        // then (期待する結果):
        let scheduled = commands
            .iter()
            .filter(|c| matches!(c, Command::ScheduleReconnect { .. }))
            .count();
        assert_eq!(scheduled, 1);
        assert_eq!(opened(&commands).len(), 1);
        assert_eq!(app.session().link().attempt(), 2);
    }

    #[test]
    fn test_nick_command_closes_and_reopens_handshake() {
        // テスト項目: /nick で接続を閉じてニックネーム入力に戻る
        // given (前提条件):
        let mut app = connected("Nightwing");

        // when (操作):
        let commands = input(&mut app, "/nick");

        // then (期待する結果):
        assert_eq!(commands[0], Command::Close);
        assert!(app.handshake().is_open());
        assert_eq!(app.session().state(), ConnectionState::AwaitingNickname);

        // 古い接続からの Closed は無視される
        let late = transport(
            &mut app,
            1,
            TransportEvent::Closed {
                code: ABNORMAL_CLOSURE,
                reason: String::new(),
            },
        );
        assert!(late.is_empty());
    }

    #[test]
    fn test_dashboard_starts_and_stops_poller() {
        // テスト項目: ダッシュボード表示中のみポーラーが動く
        // given (前提条件):
        let mut app = connected("Nightwing");

        // when (操作):
        let commands = input(&mut app, "/dashboard");

        // then (期待する結果):
        assert_eq!(commands, vec![Command::Render(Screen::DashboardPending)]);
        assert!(app.poller().is_running());

        // when (操作): 同じビューの再選択
        assert!(input(&mut app, "/dashboard").is_empty());
        assert_eq!(app.poller().starts, 1);

        // when (操作): フィードへ戻る
        input(&mut app, "/feed");
        assert!(!app.poller().is_running());
        assert_eq!(app.active_view(), View::Feed);
    }

    #[test]
    fn test_snapshot_from_stopped_generation_is_dropped() {
        // テスト項目: 停止済みの世代のポーリング結果は反映されない
        // given (前提条件):
        let mut app = connected("Nightwing");
        input(&mut app, "/dashboard");
        input(&mut app, "/feed");
        input(&mut app, "/dashboard");

        // when (操作):
        let stale = app.handle(AppEvent::MetricsPolled {
            generation: 1,
            result: Ok(snapshot(5)),
        });
        let current = app.handle(AppEvent::MetricsPolled {
            generation: 2,
            result: Ok(snapshot(7)),
        });

        // then (期待する結果):
        assert!(stale.is_empty());
        assert_eq!(current.len(), 1);
        assert_eq!(app.dashboard().chart().len(), 1);
        assert_eq!(app.dashboard().chart().create()[0], 7);
    }

    #[test]
    fn test_failed_poll_keeps_previous_snapshot() {
        // テスト項目: ポーリング失敗時は直前の値が保持される
        // given (前提条件):
        let mut app = connected("Nightwing");
        input(&mut app, "/dashboard");
        app.handle(AppEvent::MetricsPolled {
            generation: 1,
            result: Ok(snapshot(5)),
        });

        // when (操作):
        let commands = app.handle(AppEvent::MetricsPolled {
            generation: 1,
            result: Err(MetricsError::Status(500)),
        });

        // then (期待する結果):
        assert!(commands.is_empty());
        assert_eq!(app.dashboard().snapshot().unwrap().cdc_events.create, 5);
        assert_eq!(app.dashboard().chart().len(), 1);
    }

    #[test]
    fn test_messages_during_dashboard_are_replayed() {
        // テスト項目: ダッシュボード表示中に届いたメッセージはフィードに戻ったときに表示される
        // given (前提条件):
        let mut app = connected("Nightwing");
        input(&mut app, "/dashboard");

        // when (操作):
        let hidden = transport(
            &mut app,
            1,
            TransportEvent::Frame("SuperHero [Created]: {'id': 9}".to_string()),
        );
        let commands = input(&mut app, "/feed");

        // then (期待する結果):
        assert!(hidden.is_empty());
        match &commands[0] {
            Command::Render(Screen::Feed { recent, total, .. }) => {
                assert_eq!(*total, 1);
                assert_eq!(recent[0].category, Category::Create);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_quit_stops_everything() {
        // テスト項目: /quit で接続を閉じ、ポーラーを停止して終了する
        // given (前提条件):
        let mut app = connected("Nightwing");
        input(&mut app, "/dashboard");

        // when (操作):
        let commands = input(&mut app, "/quit");

        // then (期待する結果):
        assert_eq!(commands, vec![Command::Close, Command::Quit]);
        assert!(!app.poller().is_running());
    }

    #[test]
    fn test_end_to_end_scenario() {
        // テスト項目: ニックネーム入力から受信・切断・再接続までの一連の流れ
        // given (前提条件):
        let mut app = app();
        app.start();

        // when (操作): ニックネーム送信
        let commands = input(&mut app, "Nightwing");

        // then (期待する結果): 1 回目の接続試行
        assert_eq!(
            opened(&commands),
            vec![(format!("ws://example.test/ws/{}?nickname=Nightwing", NOW), 1)]
        );
        assert!(commands.contains(&Command::Render(Screen::Status {
            indicator: StatusIndicator::Connecting,
            text: "Connecting...".to_string(),
        })));

        // when (操作): 接続完了
        let commands = transport(&mut app, 1, TransportEvent::Opened);

        // then (期待する結果):
        assert!(commands.contains(&Command::Render(Screen::Status {
            indicator: StatusIndicator::Connected,
            text: "Connected".to_string(),
        })));
        assert!(app.feed().has_placeholder());

        // when (操作): CDC 通知を受信
        let commands = transport(
            &mut app,
            1,
            TransportEvent::Frame("Row Updated in super_heroes".to_string()),
        );

        // then (期待する結果):
        let messages = rendered_messages(&commands);
        assert_eq!(messages[0].0.category, Category::Update);
        assert_eq!(messages[0].0.category.label(), "UPDATE");
        assert_eq!(messages[0].1, Some(1));
        assert!(!app.feed().has_placeholder());

        // when (操作): 異常切断
        let commands = transport(
            &mut app,
            1,
            TransportEvent::Closed {
                code: ABNORMAL_CLOSURE,
                reason: String::new(),
            },
        );

        // then (期待する結果):
        assert!(commands.contains(&Command::Render(Screen::Status {
            indicator: StatusIndicator::Disconnected,
            text: "Disconnected".to_string(),
        })));
        assert!(commands.contains(&Command::ScheduleReconnect {
            attempt: 1,
            delay: Duration::from_secs(3),
        }));

        // when (操作): 3 秒後に再接続
        let commands = app.handle(AppEvent::ReconnectDue { attempt: 1 });

        // then (期待する結果):
        assert_eq!(opened(&commands).len(), 1);
        assert_eq!(opened(&commands)[0].1, 2);
        assert_eq!(app.session().state(), ConnectionState::Connecting);
        transport(&mut app, 2, TransportEvent::Opened);
        assert_eq!(app.session().state(), ConnectionState::Connected);

        // when (操作): ダッシュボードを開き、即時ポーリングの結果が届く
        input(&mut app, "/dashboard");
        let commands = app.handle(AppEvent::MetricsPolled {
            generation: 1,
            result: Ok(MetricsSnapshot {
                bytes_per_sec: 2048.0,
                uptime_seconds: 3_900,
                ..snapshot(4)
            }),
        });

        // then (期待する結果): タイルが描画されチャートに 1 点追加される
        let frame = match commands.as_slice() {
            [Command::Render(Screen::Dashboard(frame))] => frame.clone(),
            other => panic!("expected one dashboard frame, got {:?}", other),
        };
        assert_eq!(frame.tile(TILE_CONNECTED_USERS), Some("1"));
        assert_eq!(frame.tile(TILE_THROUGHPUT), Some("2.00 KB/s"));
        assert_eq!(frame.tile(TILE_UPTIME), Some("1h 5m"));
        assert_eq!(frame.users_detail, "Nightwing");
        assert_eq!(app.dashboard().chart().len(), 1);

        // when (操作): 2 秒以内にフィードへ戻り、再びダッシュボードを開く
        input(&mut app, "/feed");
        let commands = input(&mut app, "/dashboard");

        // then (期待する結果): 前回の値がすぐ表示され、新しい世代で 1 回だけポーリングされる
        assert!(matches!(
            commands.as_slice(),
            [Command::Render(Screen::Dashboard(_))]
        ));
        assert_eq!(app.poller().starts, 2);
        assert!(app.handle(AppEvent::MetricsPolled {
            generation: 1,
            result: Ok(snapshot(9)),
        })
        .is_empty());
        app.handle(AppEvent::MetricsPolled {
            generation: 2,
            result: Ok(snapshot(5)),
        });
        assert_eq!(app.dashboard().chart().len(), 2);
        assert_eq!(app.dashboard().chart().create().back(), Some(&5));
    }

    #[test]
    fn test_help_during_handshake_shows_help() {
        // テスト項目: ニックネーム入力中でも /help はヘルプを表示する
        // given (前提条件):
        let mut app = app();
        app.start();

        // when (操作):
        let commands = input(&mut app, "/help");

        // then (期待する結果):
        assert_eq!(commands, vec![Command::Render(Screen::Help)]);
        assert!(app.handshake().error().is_none());
        assert_eq!(app.session().state(), ConnectionState::AwaitingNickname);
    }
}
