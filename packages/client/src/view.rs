//! Active view selection.

use std::fmt;

use crate::metrics::PollControl;

/// Top-level views of the client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Feed,
    Dashboard,
}

impl View {
    /// Parse a view name as typed in a command (`feed`, `dashboard`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "feed" => Some(Self::Feed),
            "dashboard" => Some(Self::Dashboard),
            _ => None,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feed => write!(f, "feed"),
            Self::Dashboard => write!(f, "dashboard"),
        }
    }
}

/// Owns the active view and the metrics poller.
///
/// The poller runs exactly while the dashboard is the active view.
pub struct ViewController<P: PollControl> {
    active: View,
    poller: P,
}

impl<P: PollControl> ViewController<P> {
    /// Start on the feed view with the poller stopped
    pub fn new(poller: P) -> Self {
        Self {
            active: View::Feed,
            poller,
        }
    }

    pub fn active(&self) -> View {
        self.active
    }

    pub fn poller(&self) -> &P {
        &self.poller
    }

    /// Switch to `view`. Returns `false` (and does nothing) if it is already active.
    pub fn select(&mut self, view: View) -> bool {
        if view == self.active {
            return false;
        }

        tracing::debug!(from = %self.active, to = %view, "Switching view");
        match view {
            View::Dashboard => self.poller.start(),
            View::Feed => self.poller.stop(),
        }
        self.active = view;
        true
    }

    /// Stop background work before the client exits
    pub fn shutdown(&mut self) {
        self.poller.stop();
    }
}
