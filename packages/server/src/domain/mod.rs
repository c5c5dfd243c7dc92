//! Domain model of the development backend.
//!
//! Participants of the event channel and the interfaces the use cases depend
//! on. Concrete implementations live in the infrastructure layer.

mod message_pusher;
mod participant;
mod repository;

pub use message_pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use participant::Participant;
pub use repository::{ParticipantRepository, RepositoryError};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
