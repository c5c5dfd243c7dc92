//! Event channel: lifecycle state machine and WebSocket transport.

mod state;
mod transport;

pub use state::{
    CONNECTED_NOTICE, CONNECTION_LOST_NOTICE, ConnectionState, DEFAULT_REJECTION_REASON, Effect,
    Link, LinkEvent, StatusIndicator, Transition, transition,
};
pub use transport::Connection;
