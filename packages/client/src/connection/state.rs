//! Connection lifecycle state machine.
//!
//! This module contains pure functions that implement the lifecycle rules
//! without side effects, making them easy to test. The caller executes the
//! returned [`Effect`]s.
//!
//! Every connection attempt gets a new attempt number. Transport events and
//! reconnection timers carry the attempt they belong to, and anything tagged
//! with a superseded attempt is ignored.

use cdc_feed_shared::protocol::is_policy_rejection;

/// Lifecycle state of the event channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Idle,
    AwaitingNickname,
    Connecting,
    Connected,
    Disconnected,
    RejectedByServer,
}

impl ConnectionState {
    /// Whether the handshake prompt owns the input line in this state
    pub fn expects_nickname(&self) -> bool {
        matches!(self, Self::AwaitingNickname | Self::RejectedByServer)
    }
}

/// The three states of the visible status indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIndicator {
    Connecting,
    Connected,
    Disconnected,
}

impl StatusIndicator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

/// State machine data: the current state plus attempt bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Link {
    state: ConnectionState,
    attempt: u64,
    reconnect_pending: bool,
}

impl Link {
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Number of the most recent connection attempt (0 before the first one)
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Whether a reconnection timer for the current attempt is outstanding
    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_pending
    }

    fn with_state(self, state: ConnectionState) -> Self {
        Self { state, ..self }
    }

    fn next_attempt(self) -> Self {
        Self {
            state: ConnectionState::Connecting,
            attempt: self.attempt + 1,
            reconnect_pending: false,
        }
    }

    fn is_current(&self, attempt: u64) -> bool {
        self.attempt == attempt
    }
}

/// Inputs of the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// The client has started
    Start,
    /// The handshake accepted a nickname
    NicknameAccepted,
    /// The transport finished its opening handshake
    Opened { attempt: u64 },
    /// The transport closed, with the close code and reason it reported
    Closed {
        attempt: u64,
        code: u16,
        reason: String,
    },
    /// The transport failed
    TransportError { attempt: u64 },
    /// A reconnection timer fired
    ReconnectDue { attempt: u64 },
    /// The user asked to change nickname
    IdentityChange,
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Update the status indicator
    Status {
        indicator: StatusIndicator,
        text: String,
    },
    /// Append a system notice to the feed
    Notice(String),
    /// (Re)open the handshake prompt, optionally with an inline error
    ShowHandshake { error: Option<String> },
    /// Open the event channel for the given attempt
    Open { attempt: u64 },
    /// Close the event channel
    Close,
    /// Arm the one-shot reconnection timer for the given attempt
    ScheduleReconnect { attempt: u64 },
}

/// Result of one transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub link: Link,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(link: Link) -> Self {
        Self {
            link,
            effects: Vec::new(),
        }
    }
}

pub const CONNECTED_NOTICE: &str = "Connected to the CDC event stream";
pub const CONNECTION_LOST_NOTICE: &str = "Connection lost. Attempting to reconnect...";
pub const DEFAULT_REJECTION_REASON: &str = "Nickname rejected by server";

fn status(indicator: StatusIndicator, text: &str) -> Effect {
    Effect::Status {
        indicator,
        text: text.to_string(),
    }
}

/// Compute the next link and the effects for one event.
pub fn transition(link: Link, event: &LinkEvent) -> Transition {
    use ConnectionState::*;

    match (link.state, event) {
        (Idle, LinkEvent::Start) => Transition {
            link: link.with_state(AwaitingNickname),
            effects: vec![
                status(StatusIndicator::Disconnected, "Waiting for nickname"),
                Effect::ShowHandshake { error: None },
            ],
        },

        (AwaitingNickname | RejectedByServer, LinkEvent::NicknameAccepted) => {
            let next = link.next_attempt();
            Transition {
                link: next,
                effects: vec![
                    status(StatusIndicator::Connecting, "Connecting..."),
                    Effect::Open {
                        attempt: next.attempt,
                    },
                ],
            }
        }

        (Connecting, LinkEvent::Opened { attempt }) if link.is_current(*attempt) => Transition {
            link: link.with_state(Connected),
            effects: vec![
                status(StatusIndicator::Connected, "Connected"),
                Effect::Notice(CONNECTED_NOTICE.to_string()),
            ],
        },

        (Connecting | Connected | Disconnected, LinkEvent::Closed { attempt, code, reason })
            if link.is_current(*attempt) && !link.reconnect_pending =>
        {
            if is_policy_rejection(*code) {
                let reason = if reason.trim().is_empty() {
                    DEFAULT_REJECTION_REASON.to_string()
                } else {
                    reason.clone()
                };
                Transition {
                    link: link.with_state(RejectedByServer),
                    effects: vec![
                        status(StatusIndicator::Disconnected, "Nickname rejected"),
                        Effect::Notice(reason.clone()),
                        Effect::ShowHandshake {
                            error: Some(reason),
                        },
                    ],
                }
            } else {
                Transition {
                    link: Link {
                        state: Disconnected,
                        reconnect_pending: true,
                        ..link
                    },
                    effects: vec![
                        status(StatusIndicator::Disconnected, "Disconnected"),
                        Effect::Notice(CONNECTION_LOST_NOTICE.to_string()),
                        Effect::ScheduleReconnect {
                            attempt: link.attempt,
                        },
                    ],
                }
            }
        }

        (Connecting | Connected, LinkEvent::TransportError { attempt })
            if link.is_current(*attempt) =>
        {
            Transition {
                link: link.with_state(Disconnected),
                effects: vec![status(StatusIndicator::Disconnected, "Connection Error")],
            }
        }

        (Disconnected, LinkEvent::ReconnectDue { attempt })
            if link.is_current(*attempt) && link.reconnect_pending =>
        {
            let next = link.next_attempt();
            Transition {
                link: next,
                effects: vec![
                    status(StatusIndicator::Connecting, "Reconnecting..."),
                    Effect::Open {
                        attempt: next.attempt,
                    },
                ],
            }
        }

        (state, LinkEvent::IdentityChange) if state != Idle => {
            // Bumping the attempt invalidates the open connection and any armed timer.
            let next = Link {
                state: AwaitingNickname,
                attempt: link.attempt + 1,
                reconnect_pending: false,
            };
            Transition {
                link: next,
                effects: vec![
                    Effect::Close,
                    status(StatusIndicator::Disconnected, "Waiting for nickname"),
                    Effect::ShowHandshake { error: None },
                ],
            }
        }

        _ => Transition::unchanged(link),
    }
}
