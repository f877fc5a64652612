//! In-process event queue backed by a tokio unbounded `mpsc` channel.

use tokio::sync::mpsc;

use cloudlink_domain::error::CloudLinkError;
use cloudlink_domain::event::EventMessage;

use crate::ports::EventSink;

/// In-process event queue using a tokio unbounded [`mpsc`] channel.
///
/// Devices push events synchronously; the transport drains the receiver at
/// its own pace. Sending fails once the receiver has been dropped.
#[derive(Debug, Clone)]
pub struct EventQueue {
    sender: mpsc::UnboundedSender<EventMessage>,
}

impl EventQueue {
    /// Create a queue and the receiver the transport drains.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EventMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Whether the receiving side is gone.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl EventSink for EventQueue {
    fn send(&self, event: EventMessage) -> Result<(), CloudLinkError> {
        // mpsc::SendError only happens when the receiver is dropped.
        self.sender
            .send(event)
            .map_err(|_| CloudLinkError::SinkClosed)
    }
}
