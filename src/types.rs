use serde::{Deserialize, Serialize};

/// Body of `POST /upload-sms` as sent by the phone app.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SmsPayload {
    pub sender: Option<String>,
    pub body: Option<String>,
    /// Phone-side receive time, in whatever shape the client sends it.
    /// Not used for the log line.
    pub timestamp: Option<serde_json::Value>,
}

impl SmsPayload {
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
    pub message: String,
}

impl Ack {
    pub fn received() -> Self {
        Self {
            status: "success".to_string(),
            message: "SMS received".to_string(),
        }
    }

    pub fn invalid_json() -> Self {
        Self {
            status: "error".to_string(),
            message: "Invalid JSON".to_string(),
        }
    }
}
