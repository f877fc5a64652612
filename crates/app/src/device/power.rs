//! Generic power-state capability shared by every device kind.
//!
//! Handles the `setPowerState` action (`{"state": "On" | "Off"}`) and emits
//! the matching `setPowerState` event.

use cloudlink_domain::event::Cause;
use cloudlink_domain::id::DeviceId;
use cloudlink_domain::names::{
    ACTION_SET_POWER_STATE, EVENT_SET_POWER_STATE, FIELD_STATE, POWER_OFF, POWER_ON,
};
use cloudlink_domain::payload::Payload;

use crate::device::base::DeviceCore;
use crate::ports::EventSink;
use crate::router::{ActionHandler, Dispatch};

/// Callback for `setPowerState`: receives the requested state and may
/// overwrite it with the state actually reached.
pub type PowerStateCallback = Box<dyn Fn(&DeviceId, &mut bool) -> bool + Send + Sync>;

/// The power-state handler stage.
#[derive(Default)]
pub struct PowerState {
    callback: Option<PowerStateCallback>,
}

impl PowerState {
    /// Register the callback, replacing any previous one.
    pub fn set_callback<F>(&mut self, callback: F)
    where
        F: Fn(&DeviceId, &mut bool) -> bool + Send + Sync + 'static,
    {
        self.callback = Some(Box::new(callback));
    }

    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.callback.is_some()
    }
}

impl ActionHandler for PowerState {
    fn handle_action(
        &self,
        device_id: &DeviceId,
        action: &str,
        request: &Payload,
        response: &mut Payload,
    ) -> Dispatch {
        if action != ACTION_SET_POWER_STATE {
            return Dispatch::Unhandled;
        }
        let Some(callback) = &self.callback else {
            return Dispatch::Unhandled;
        };
        let mut state = request.str_or(FIELD_STATE, POWER_OFF) == POWER_ON;
        let success = callback(device_id, &mut state);
        response.insert_str(FIELD_STATE, power_str(state));
        Dispatch::Handled(success)
    }
}

impl<S: EventSink> DeviceCore<S> {
    /// Emit a `setPowerState` event.
    pub fn send_power_state_event(&self, state: bool, cause: Cause) -> bool {
        let mut event = self.prepare_event(EVENT_SET_POWER_STATE, cause);
        event.value_mut().insert_str(FIELD_STATE, power_str(state));
        self.send_event(event)
    }
}

fn power_str(state: bool) -> &'static str {
    if state { POWER_ON } else { POWER_OFF }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::base::tests::RecordingSink;
    use serde_json::json;

    fn device() -> DeviceId {
        DeviceId::new("thermostat-1").unwrap()
    }

    fn request(value: serde_json::Value) -> Payload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn should_ignore_other_actions() {
        let mut power = PowerState::default();
        power.set_callback(|_, _| true);
        let mut response = Payload::new();
        let outcome = power.handle_action(&device(), "targetTemperature", &Payload::new(), &mut response);
        assert_eq!(outcome, Dispatch::Unhandled);
        assert!(response.is_empty());
    }

    #[test]
    fn should_be_unhandled_without_callback() {
        let power = PowerState::default();
        assert!(!power.is_registered());
        let mut response = Payload::new();
        let outcome = power.handle_action(
            &device(),
            "setPowerState",
            &request(json!({"state": "On"})),
            &mut response,
        );
        assert_eq!(outcome, Dispatch::Unhandled);
        assert!(response.is_empty());
    }

    #[test]
    fn should_pass_requested_state_and_echo_it() {
        let mut power = PowerState::default();
        power.set_callback(|_, state| *state);
        let mut response = Payload::new();

        let outcome = power.handle_action(
            &device(),
            "setPowerState",
            &request(json!({"state": "On"})),
            &mut response,
        );

        assert_eq!(outcome, Dispatch::Handled(true));
        assert_eq!(response.get("state"), Some(&json!("On")));
    }

    #[test]
    fn should_treat_missing_state_as_off() {
        let mut power = PowerState::default();
        power.set_callback(|_, state| !*state);
        let mut response = Payload::new();

        let outcome = power.handle_action(&device(), "setPowerState", &Payload::new(), &mut response);

        assert_eq!(outcome, Dispatch::Handled(true));
        assert_eq!(response.get("state"), Some(&json!("Off")));
    }

    #[test]
    fn should_echo_state_written_by_callback_on_failure() {
        let mut power = PowerState::default();
        power.set_callback(|_, state| {
            *state = false;
            false
        });
        let mut response = Payload::new();

        let outcome = power.handle_action(
            &device(),
            "setPowerState",
            &request(json!({"state": "On"})),
            &mut response,
        );

        assert_eq!(outcome, Dispatch::Handled(false));
        assert_eq!(response.get("state"), Some(&json!("Off")));
    }

    #[test]
    fn should_emit_power_state_event() {
        let sink = RecordingSink::default();
        let core = DeviceCore::new(device(), &sink);

        assert!(core.send_power_state_event(true, Cause::physical_interaction()));

        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].action(), "setPowerState");
        assert_eq!(sent[0].payload.cause.as_str(), "PHYSICAL_INTERACTION");
        assert_eq!(sent[0].payload.value.get("state"), Some(&json!("On")));
    }
}
