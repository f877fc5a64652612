//! Device registry: the inbound side of the transport.
//!
//! The transport decodes a [`RequestMessage`] and hands it to the registry,
//! which offers it to each registered device in turn and builds the
//! [`ResponseMessage`] to send back.

use cloudlink_domain::error::{CloudLinkError, ValidationError};
use cloudlink_domain::message::{RequestMessage, ResponseMessage};
use cloudlink_domain::payload::Payload;

use crate::device::Device;

/// Response message text when a device handled the request.
pub const MESSAGE_OK: &str = "OK";
/// Response message text when no registered device has the requested id.
pub const MESSAGE_UNKNOWN_DEVICE: &str = "Device does not exist";
/// Response message text when the device did not handle the action.
pub const MESSAGE_NOT_HANDLED: &str = "Request not handled";

/// Ordered collection of devices sharing one transport.
#[derive(Default)]
pub struct DeviceRegistry {
    devices: Vec<Box<dyn Device>>,
}

impl DeviceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateDevice`] if a device with the same
    /// id is already registered.
    pub fn register(&mut self, device: impl Device + 'static) -> Result<(), CloudLinkError> {
        let id = device.device_id();
        if self.contains(id.as_str()) {
            return Err(ValidationError::DuplicateDevice(id.to_string()).into());
        }
        tracing::info!(device_id = %id, "device registered");
        self.devices.push(Box::new(device));
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Whether a device with `device_id` is registered.
    #[must_use]
    pub fn contains(&self, device_id: &str) -> bool {
        self.devices.iter().any(|d| d.device_id() == device_id)
    }

    /// Offer the action to every device until one handles it successfully.
    pub fn handle_request(
        &self,
        device_id: &str,
        action: &str,
        request: &Payload,
        response: &mut Payload,
    ) -> bool {
        self.devices
            .iter()
            .any(|device| device.handle_request(device_id, action, request, response))
    }

    /// Dispatch a decoded request and build its response.
    #[tracing::instrument(skip(self, request), fields(device_id = %request.payload.device_id, action = %request.payload.action))]
    pub fn dispatch(&self, request: &RequestMessage) -> ResponseMessage {
        let payload = &request.payload;
        let mut value = Payload::new();
        let success = self.handle_request(
            &payload.device_id,
            &payload.action,
            &payload.value,
            &mut value,
        );
        let message = if success {
            MESSAGE_OK
        } else if self.contains(&payload.device_id) {
            MESSAGE_NOT_HANDLED
        } else {
            MESSAGE_UNKNOWN_DEVICE
        };
        tracing::debug!(success, reason = message, "request dispatched");
        ResponseMessage::for_request(request, success, message, value)
    }
}
