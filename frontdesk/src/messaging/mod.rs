//! Guest messaging: templates, rendering, delivery and timers.

mod scheduler;
mod sender;
mod template;

pub use scheduler::{MessageScheduler, TimedMessage, TimerRole};
pub use sender::{LogSender, MessageSender, OutgoingMessage};
pub use template::{
    next_custom_key, render, TemplateContext, TemplateKey, TemplateSet, FALLBACK_RESTO_NAME,
};

#[cfg(test)]
pub use sender::MockMessageSender;
