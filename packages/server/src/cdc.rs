//! Debezium change envelopes and their text rendering.
//!
//! A change event is turned into one line of free text, e.g.
//! `SuperHero [Updated]: {"id":1,"name":"Nightwing"}`. Clients only ever see
//! that line.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Label used for rows when none is configured
pub const DEFAULT_ENTITY: &str = "SuperHero";

/// Topic reported when none is configured
pub const DEFAULT_TOPIC: &str = "postgres.public.super_heroes";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CdcError {
    #[error("Unknown CDC operation: '{0}'")]
    UnknownOperation(String),
}

/// Debezium envelope: `{ "payload": { "op", "before", "after" } }`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChangeEnvelope {
    #[serde(default)]
    pub payload: ChangePayload,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChangePayload {
    #[serde(default)]
    pub op: String,
    #[serde(default)]
    pub before: Option<Value>,
    #[serde(default)]
    pub after: Option<Value>,
}

/// Row operation of a change event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// Initial snapshot read
    Snapshot,
}

impl Operation {
    /// Bracketed tag placed after the entity label
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Create => "Created",
            Self::Update => "Updated",
            Self::Delete => "Deleted",
            Self::Snapshot => "Snapshot",
        }
    }
}

impl TryFrom<&str> for Operation {
    type Error = CdcError;

    fn try_from(op: &str) -> Result<Self, Self::Error> {
        match op {
            "c" => Ok(Self::Create),
            "u" => Ok(Self::Update),
            "d" => Ok(Self::Delete),
            "r" => Ok(Self::Snapshot),
            other => Err(CdcError::UnknownOperation(other.to_string())),
        }
    }
}

/// A change event ready to broadcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotice {
    pub operation: Operation,
    pub text: String,
}

/// Render an envelope as a notification line.
///
/// Deletes show the `before` image; every other operation shows `after`.
pub fn format_change(entity: &str, envelope: &ChangeEnvelope) -> Result<ChangeNotice, CdcError> {
    let operation = Operation::try_from(envelope.payload.op.as_str())?;
    let row = match operation {
        Operation::Delete => &envelope.payload.before,
        _ => &envelope.payload.after,
    };

    Ok(ChangeNotice {
        operation,
        text: format!("{} [{}]: {}", entity, operation.tag(), render_row(row)),
    })
}

fn render_row(row: &Option<Value>) -> String {
    match row {
        Some(value) => value.to_string(),
        None => "{}".to_string(),
    }
}
