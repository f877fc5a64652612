//! Devices: addressable instances that answer actions and emit events.
//!
//! Every device kind is assembled from the same parts: a [`base::DeviceCore`]
//! holding identity and the event path, the generic [`power::PowerState`]
//! capability, and its own capability stage, all combined through
//! [`crate::router::route`].

pub mod base;
pub mod power;

use std::sync::Arc;

use cloudlink_domain::id::DeviceId;
use cloudlink_domain::payload::Payload;

/// One addressable device instance.
///
/// A shared transport may offer every request to every device; each device
/// answers `false` for requests not addressed to it.
pub trait Device: Send + Sync {
    /// This instance's identity.
    fn device_id(&self) -> &DeviceId;

    /// Handle `action` if `device_id` matches this instance.
    ///
    /// Returns `true` only when a registered callback handled the action and
    /// reported success. `response` receives the echoed value whenever a
    /// callback ran, successful or not.
    fn handle_request(
        &self,
        device_id: &str,
        action: &str,
        request: &Payload,
        response: &mut Payload,
    ) -> bool;
}

impl<T: Device + ?Sized> Device for Arc<T> {
    fn device_id(&self) -> &DeviceId {
        (**self).device_id()
    }

    fn handle_request(
        &self,
        device_id: &str,
        action: &str,
        request: &Payload,
        response: &mut Payload,
    ) -> bool {
        (**self).handle_request(device_id, action, request, response)
    }
}

impl<T: Device + ?Sized> Device for Box<T> {
    fn device_id(&self) -> &DeviceId {
        (**self).device_id()
    }

    fn handle_request(
        &self,
        device_id: &str,
        action: &str,
        request: &Payload,
        response: &mut Payload,
    ) -> bool {
        (**self).handle_request(device_id, action, request, response)
    }
}
