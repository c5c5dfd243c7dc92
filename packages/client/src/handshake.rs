//! Nickname handshake.
//!
//! The handshake prompt gates everything else: no connection is attempted until
//! it has accepted a nickname. The validation rules themselves are shared with
//! the server.

pub use cdc_feed_shared::nickname::{Nickname, NicknameError, validate};

/// The handshake prompt: whether it is shown and the inline error under it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Handshake {
    open: bool,
    error: Option<String>,
}

impl Handshake {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Inline error currently shown under the prompt
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Show the prompt, with an optional error carried over (e.g. a server rejection)
    pub fn open(&mut self, error: Option<String>) {
        self.open = true;
        self.error = error;
    }

    /// Validate a candidate nickname.
    ///
    /// On success the prompt is dismissed. On failure the reason becomes the
    /// inline error and the prompt stays open.
    pub fn submit(&mut self, raw: &str) -> Result<Nickname, NicknameError> {
        match validate(raw) {
            Ok(nickname) => {
                self.open = false;
                self.error = None;
                Ok(nickname)
            }
            Err(reason) => {
                self.error = Some(reason.to_string());
                Err(reason)
            }
        }
    }
}
