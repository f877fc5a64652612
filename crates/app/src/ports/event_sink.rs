//! Event sink port: the outbound half of the transport.

use std::sync::Arc;

use cloudlink_domain::error::CloudLinkError;
use cloudlink_domain::event::EventMessage;

/// Accepts event messages bound for the cloud.
///
/// Implementations enqueue or transmit the message. Delivery guarantees,
/// signing and retries are the implementation's concern; callers only learn
/// whether the message was accepted.
pub trait EventSink {
    /// Hand `event` to the transport.
    ///
    /// # Errors
    ///
    /// Returns [`CloudLinkError::SinkClosed`] or [`CloudLinkError::Transport`]
    /// when the message was not accepted.
    fn send(&self, event: EventMessage) -> Result<(), CloudLinkError>;
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn send(&self, event: EventMessage) -> Result<(), CloudLinkError> {
        (**self).send(event)
    }
}

impl<T: EventSink + ?Sized> EventSink for &T {
    fn send(&self, event: EventMessage) -> Result<(), CloudLinkError> {
        (**self).send(event)
    }
}
