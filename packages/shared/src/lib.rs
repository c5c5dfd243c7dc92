//! Pieces shared by the CDC feed client and the development server.
//!
//! The wire contract between the two lives here: the nickname rules applied on
//! both sides of the handshake, the close code used for nickname rejection, and
//! the metrics document served by `/api/metrics`.

pub mod logger;
pub mod metrics;
pub mod nickname;
pub mod protocol;
pub mod time;
