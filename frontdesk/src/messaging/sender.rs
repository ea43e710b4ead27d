//! The outbound message boundary.
//!
//! Real delivery (SMS, WhatsApp) is out of reach of this crate; a
//! [`MessageSender`] receives fully rendered messages and does whatever the
//! deployment needs with them. [`LogSender`] only logs.

use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::property::PropertyRef;

use super::template::TemplateKey;

/// A rendered message addressed to one guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMessage {
    /// The property the guest belongs to.
    pub property: PropertyRef,
    /// The guest's store key.
    pub guest_id: String,
    /// The template the text was rendered from.
    #[serde(serialize_with = "serialize_key")]
    pub key: TemplateKey,
    /// Destination mobile number.
    pub mobile: String,
    /// Rendered text.
    pub text: String,
}

fn serialize_key<S: serde::Serializer>(key: &TemplateKey, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.collect_str(key)
}

/// Delivers rendered messages.
#[cfg_attr(test, mockall::automock)]
pub trait MessageSender: Send + Sync {
    /// Delivers one message.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails. Callers log and move on; nothing
    /// is retried.
    fn send(&self, message: &OutgoingMessage) -> Result<()>;
}

impl<T: MessageSender + ?Sized> MessageSender for Arc<T> {
    fn send(&self, message: &OutgoingMessage) -> Result<()> {
        (**self).send(message)
    }
}

/// A sender that logs each message at info level and delivers nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSender;

impl MessageSender for LogSender {
    fn send(&self, message: &OutgoingMessage) -> Result<()> {
        log::info!(
            "Sending {} message to {}: {}",
            message.key,
            message.mobile,
            message.text
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> OutgoingMessage {
        OutgoingMessage {
            property: PropertyRef::hotel("h1"),
            guest_id: "g1".into(),
            key: TemplateKey::Custom(42),
            mobile: "9876543210".into(),
            text: "Hi".into(),
        }
    }

    #[test]
    fn test_log_sender_accepts_everything() {
        assert!(LogSender.send(&message()).is_ok());
    }

    #[test]
    fn test_arc_forwards_to_inner_sender() {
        let mut mock = MockMessageSender::new();
        mock.expect_send()
            .withf(|m| m.key == TemplateKey::Custom(42) && m.mobile == "9876543210")
            .times(1)
            .returning(|_| Ok(()));
        let shared: Arc<dyn MessageSender> = Arc::new(mock);
        shared.send(&message()).unwrap();
    }

    #[test]
    fn test_message_serializes_key_as_string() {
        let value = serde_json::to_value(message()).unwrap();
        assert_eq!(value["key"], "custom_42");
        assert_eq!(value["property"]["node"], "hotels");
    }
}
