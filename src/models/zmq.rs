use serde::{Deserialize, Serialize};

/// Message published to the emailer service.
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct ZmqBillEmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    /// Paths relative to the upload directory.
    pub attachments: Vec<String>,
}
