//! Staged action routing.
//!
//! A device answers a request by offering it to an ordered list of handler
//! stages. Generic capabilities (power state) come first, device-kind
//! capabilities after; the first stage that claims the action decides the
//! outcome and later stages never see it.

use cloudlink_domain::id::DeviceId;
use cloudlink_domain::payload::Payload;

/// What a stage did with an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The stage does not know the action, or its callback is not registered.
    Unhandled,
    /// The stage ran a callback, which reported this result.
    Handled(bool),
}

/// One stage of the router.
pub trait ActionHandler {
    /// Try to handle `action` for `device_id`.
    ///
    /// Stages that return [`Dispatch::Unhandled`] must leave `response` alone.
    fn handle_action(
        &self,
        device_id: &DeviceId,
        action: &str,
        request: &Payload,
        response: &mut Payload,
    ) -> Dispatch;
}

/// Offer `action` to each stage in order.
///
/// Returns `true` only if a stage handled the action and its callback
/// succeeded.
pub fn route(
    stages: &[&dyn ActionHandler],
    device_id: &DeviceId,
    action: &str,
    request: &Payload,
    response: &mut Payload,
) -> bool {
    for stage in stages {
        if let Dispatch::Handled(success) =
            stage.handle_action(device_id, action, request, response)
        {
            tracing::debug!(%device_id, action, success, "action handled");
            return success;
        }
    }
    tracing::debug!(%device_id, action, "action not handled");
    false
}
