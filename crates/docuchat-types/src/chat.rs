//! Conversation message types for Docuchat.
//!
//! A [`Message`] is immutable once created. Its serialized form is the
//! display/wire schema consumed by front-ends:
//! `{ "text": string, "user": "USER" | "AI", "date": string }`.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::document::DocumentRef;

use std::fmt;
use std::str::FromStr;

/// Display format for message timestamps (local time).
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sender {
    User,
    Ai,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "USER"),
            Sender::Ai => write!(f, "AI"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USER" => Ok(Sender::User),
            "AI" => Ok(Sender::Ai),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// A single entry in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    #[serde(rename = "user")]
    pub sender: Sender,
    /// Formatted creation time.
    #[serde(rename = "date")]
    pub timestamp: String,
}

impl Message {
    /// Create a message stamped with the current local time.
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self::at(text, sender, Local::now())
    }

    /// Create a message stamped with an explicit time.
    pub fn at<Tz>(text: impl Into<String>, sender: Sender, time: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self {
            text: text.into(),
            sender,
            timestamp: format_timestamp(&time),
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Point-in-time view of a session, for front-ends and `--json` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub document: Option<DocumentRef>,
    pub messages: Vec<Message>,
    pub pending_send: bool,
    pub missing_document: bool,
    pub staged_prompt: String,
}

/// Format a timestamp the way messages display it.
pub fn format_timestamp<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    time.format(TIMESTAMP_FORMAT).to_string()
}
