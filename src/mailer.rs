//! Outbound bill email delivery.
//!
//! Mail is not sent from this service. Composed emails are published on the
//! emailer's ZeroMQ endpoint and delivered there.

use std::sync::Mutex;

use thiserror::Error;

use crate::models::zmq::ZmqBillEmailMessage;

/// Email carrying a bill and its service cards.
#[derive(Clone, Debug, PartialEq)]
pub struct BillEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<String>,
}

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("ZeroMQ error: {0}")]
    Zmq(#[from] zmq::Error),

    #[error("Mailer socket is poisoned")]
    Poisoned,
}

pub trait BillMailer: Send + Sync {
    fn send(&self, email: &BillEmail) -> Result<(), MailerError>;
}

/// Publishes bill emails to the emailer service.
pub struct ZmqMailer {
    from: String,
    socket: Mutex<zmq::Socket>,
}

impl ZmqMailer {
    pub fn connect(endpoint: &str, from: impl Into<String>) -> Result<Self, MailerError> {
        let context = zmq::Context::new();
        let socket = context.socket(zmq::PUB)?;
        socket.connect(endpoint)?;
        Ok(Self {
            from: from.into(),
            socket: Mutex::new(socket),
        })
    }

    fn message(&self, email: &BillEmail) -> ZmqBillEmailMessage {
        ZmqBillEmailMessage {
            from: self.from.clone(),
            to: email.to.clone(),
            subject: email.subject.clone(),
            body: email.body.clone(),
            attachments: email.attachments.clone(),
        }
    }
}

impl BillMailer for ZmqMailer {
    fn send(&self, email: &BillEmail) -> Result<(), MailerError> {
        let payload = serde_json::to_vec(&self.message(email))?;
        let socket = self.socket.lock().map_err(|_| MailerError::Poisoned)?;
        socket.send(payload, 0)?;
        log::info!("Published bill email to {}", email.to);
        Ok(())
    }
}
