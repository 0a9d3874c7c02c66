use crate::types::SmsPayload;
use chrono::{DateTime, Local};
use std::fmt;

pub const PREVIEW_CHARS: usize = 50;
pub const UNKNOWN_SENDER: &str = "Unknown";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One line of the SMS log, derived from an ingested payload.
///
/// Only the first [`PREVIEW_CHARS`] characters of the body are kept. The
/// line is lossy and not meant to be parsed back.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub timestamp: DateTime<Local>,
    pub sender: String,
    pub preview: String,
}

impl LogLine {
    pub fn new(timestamp: DateTime<Local>, payload: &SmsPayload) -> Self {
        let sender = single_line(payload.sender.as_deref().unwrap_or(UNKNOWN_SENDER));
        let preview = single_line(&preview(payload.body.as_deref().unwrap_or("")));

        Self {
            timestamp,
            sender,
            preview,
        }
    }

    pub fn now(payload: &SmsPayload) -> Self {
        Self::new(Local::now(), payload)
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] SMS from {}: {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.sender,
            self.preview
        )
    }
}

/// One message must stay one line in the log.
fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// Cut `body` to [`PREVIEW_CHARS`] characters, marking the cut with `...`.
fn preview(body: &str) -> String {
    match body.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
