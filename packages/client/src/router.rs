//! Message routing: classification of feed entries and the feed itself.

use std::collections::VecDeque;

use thiserror::Error;

use crate::connection::ConnectionState;

/// Placeholder shown until the first real message arrives
pub const WELCOME_MESSAGE: &str = "Waiting for CDC events... Change a row to see it here.";

/// Display category of a feed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Create,
    Update,
    Delete,
    Generic,
    System,
    SelfAuthored,
}

impl Category {
    /// Label shown next to the entry
    pub fn label(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Generic => "CDC EVENT",
            Self::System => "SYSTEM",
            Self::SelfAuthored => "YOU",
        }
    }
}

/// Keyword vocabulary, checked in this order; the first hit wins.
const RULES: [(&[&str], Category); 3] = [
    (&["Created", "INSERT"], Category::Create),
    (&["Updated", "UPDATE"], Category::Update),
    (&["Deleted", "DELETE"], Category::Delete),
];

/// Classify an inbound notification by case-sensitive keyword containment.
///
/// This is a shallow heuristic over free text, not a decode: anything that
/// matches no keyword is [`Category::Generic`].
pub fn classify(text: &str) -> Category {
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Generic)
}

/// One rendered feed entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMessage {
    pub text: String,
    pub category: Category,
    /// Wall-clock time of rendering (Unix milliseconds)
    pub timestamp: i64,
}

/// The message feed, newest entry first.
///
/// Inbound events and self-authored messages are counted; system notices are
/// shown but not counted.
#[derive(Debug, Clone)]
pub struct Feed {
    entries: VecDeque<DisplayMessage>,
    placeholder: bool,
    count: u64,
}

impl Default for Feed {
    fn default() -> Self {
        Self::new()
    }
}

impl Feed {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            placeholder: true,
            count: 0,
        }
    }

    /// Render a payload received on the event channel
    pub fn render_inbound(&mut self, text: &str, timestamp: i64) -> &DisplayMessage {
        self.push_counted(DisplayMessage {
            text: text.to_string(),
            category: classify(text),
            timestamp,
        })
    }

    /// Render a message the user just sent (local echo)
    pub fn render_self(&mut self, text: &str, timestamp: i64) -> &DisplayMessage {
        self.push_counted(DisplayMessage {
            text: format!("You: {}", text),
            category: Category::SelfAuthored,
            timestamp,
        })
    }

    /// Render a system notice
    pub fn notice(&mut self, text: &str, timestamp: i64) -> &DisplayMessage {
        self.push(DisplayMessage {
            text: text.to_string(),
            category: Category::System,
            timestamp,
        })
    }

    /// Number of inbound and self-authored messages rendered so far
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Whether the welcome placeholder is still shown
    pub fn has_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, newest first
    pub fn entries(&self) -> impl Iterator<Item = &DisplayMessage> {
        self.entries.iter()
    }

    /// Up to `limit` newest entries, newest first
    pub fn recent(&self, limit: usize) -> Vec<DisplayMessage> {
        self.entries.iter().take(limit).cloned().collect()
    }

    fn push_counted(&mut self, message: DisplayMessage) -> &DisplayMessage {
        self.placeholder = false;
        self.count += 1;
        self.push(message)
    }

    fn push(&mut self, message: DisplayMessage) -> &DisplayMessage {
        self.entries.push_front(message);
        &self.entries[0]
    }
}

/// Why a local submission was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejection {
    #[error("Cannot send an empty message")]
    Empty,

    #[error("Cannot send message: Not connected to server")]
    NotConnected,
}

/// Check whether `text` may be sent in the current connection state.
///
/// On success the text is returned unchanged; it is transmitted verbatim.
pub fn check_submission(text: &str, state: ConnectionState) -> Result<&str, SubmitRejection> {
    if text.trim().is_empty() {
        return Err(SubmitRejection::Empty);
    }
    if state != ConnectionState::Connected {
        return Err(SubmitRejection::NotConnected);
    }
    Ok(text)
}
