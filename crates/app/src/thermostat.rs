//! Thermostat binding.
//!
//! Actions (after the generic power state):
//!
//! | action | payload | missing key |
//! |--------|---------|-------------|
//! | `targetTemperature` | `temperature` | [`DEFAULT_TARGET_TEMPERATURE`] |
//! | `adjustTargetTemperature` | `temperature` (delta) | read as `0.0`, no default |
//! | `setThermostatMode` | `thermostatMode` | empty string |
//!
//! Each callback receives the value by mutable reference; whatever it leaves
//! there is echoed in the response, even when it reports failure.
//!
//! Events: `currentTemperature`, `targetTemperature`, `setThermostatMode`
//! and `setPowerState`. Temperatures are quantized to one decimal.

use std::time::Duration;

use cloudlink_domain::event::{Cause, round_to_tenth};
use cloudlink_domain::id::DeviceId;
use cloudlink_domain::names::{
    ACTION_ADJUST_TARGET_TEMPERATURE, ACTION_SET_THERMOSTAT_MODE, ACTION_TARGET_TEMPERATURE,
    EVENT_CURRENT_TEMPERATURE, EVENT_SET_THERMOSTAT_MODE, EVENT_TARGET_TEMPERATURE,
    FIELD_HUMIDITY, FIELD_TEMPERATURE, FIELD_THERMOSTAT_MODE,
};
use cloudlink_domain::payload::Payload;

use crate::device::Device;
use crate::device::base::DeviceCore;
use crate::device::power::PowerState;
use crate::ports::EventSink;
use crate::router::{ActionHandler, Dispatch, route};

/// Target temperature used when `targetTemperature` arrives without one.
pub const DEFAULT_TARGET_TEMPERATURE: f32 = 1.0;

/// Humidity reported when the caller has no humidity reading.
pub const HUMIDITY_UNAVAILABLE: f32 = -1.0;

/// Callback for `targetTemperature` and `adjustTargetTemperature`.
pub type TemperatureCallback = Box<dyn Fn(&DeviceId, &mut f32) -> bool + Send + Sync>;

/// Callback for `setThermostatMode`.
pub type ThermostatModeCallback = Box<dyn Fn(&DeviceId, &mut String) -> bool + Send + Sync>;

#[derive(Default)]
struct ThermostatCapabilities {
    target_temperature: Option<TemperatureCallback>,
    adjust_target_temperature: Option<TemperatureCallback>,
    thermostat_mode: Option<ThermostatModeCallback>,
}

impl ActionHandler for ThermostatCapabilities {
    fn handle_action(
        &self,
        device_id: &DeviceId,
        action: &str,
        request: &Payload,
        response: &mut Payload,
    ) -> Dispatch {
        match action {
            ACTION_TARGET_TEMPERATURE => {
                let Some(callback) = &self.target_temperature else {
                    return Dispatch::Unhandled;
                };
                let mut temperature = request.f32_or(FIELD_TEMPERATURE, DEFAULT_TARGET_TEMPERATURE);
                let success = callback(device_id, &mut temperature);
                response.insert_f32(FIELD_TEMPERATURE, temperature);
                Dispatch::Handled(success)
            }
            ACTION_ADJUST_TARGET_TEMPERATURE => {
                let Some(callback) = &self.adjust_target_temperature else {
                    return Dispatch::Unhandled;
                };
                // No default here, unlike targetTemperature: a missing delta reads as 0.0.
                let mut delta = request.f32_lenient(FIELD_TEMPERATURE);
                let success = callback(device_id, &mut delta);
                response.insert_f32(FIELD_TEMPERATURE, delta);
                Dispatch::Handled(success)
            }
            ACTION_SET_THERMOSTAT_MODE => {
                let Some(callback) = &self.thermostat_mode else {
                    return Dispatch::Unhandled;
                };
                let mut mode = request.str_or(FIELD_THERMOSTAT_MODE, "").to_owned();
                let success = callback(device_id, &mut mode);
                response.insert_str(FIELD_THERMOSTAT_MODE, mode);
                Dispatch::Handled(success)
            }
            _ => Dispatch::Unhandled,
        }
    }
}

/// A thermostat device.
///
/// Register callbacks with the `on_*` methods during setup, then hand the
/// thermostat to the transport. Registration needs `&mut self` and dispatch
/// only `&self`, so callbacks cannot change while requests are served.
pub struct Thermostat<S> {
    core: DeviceCore<S>,
    power: PowerState,
    capabilities: ThermostatCapabilities,
}

impl<S: EventSink> Thermostat<S> {
    /// Create a thermostat with no callbacks registered.
    pub fn new(id: DeviceId, sink: S) -> Self {
        Self {
            core: DeviceCore::new(id, sink),
            power: PowerState::default(),
            capabilities: ThermostatCapabilities::default(),
        }
    }

    /// Replace the minimum delay between two events of the same name.
    #[must_use]
    pub fn with_event_wait_time(mut self, wait: Duration) -> Self {
        self.core = self.core.with_event_wait_time(wait);
        self
    }

    #[must_use]
    pub fn id(&self) -> &DeviceId {
        self.core.id()
    }

    /// Register the `setPowerState` callback.
    pub fn on_power_state<F>(&mut self, callback: F)
    where
        F: Fn(&DeviceId, &mut bool) -> bool + Send + Sync + 'static,
    {
        self.power.set_callback(callback);
    }

    /// Register the `targetTemperature` callback.
    pub fn on_target_temperature<F>(&mut self, callback: F)
    where
        F: Fn(&DeviceId, &mut f32) -> bool + Send + Sync + 'static,
    {
        self.capabilities.target_temperature = Some(Box::new(callback));
    }

    /// Register the `adjustTargetTemperature` callback. It receives the delta.
    pub fn on_adjust_target_temperature<F>(&mut self, callback: F)
    where
        F: Fn(&DeviceId, &mut f32) -> bool + Send + Sync + 'static,
    {
        self.capabilities.adjust_target_temperature = Some(Box::new(callback));
    }

    /// Register the `setThermostatMode` callback.
    pub fn on_thermostat_mode<F>(&mut self, callback: F)
    where
        F: Fn(&DeviceId, &mut String) -> bool + Send + Sync + 'static,
    {
        self.capabilities.thermostat_mode = Some(Box::new(callback));
    }

    /// Dispatch one action. See [`Device::handle_request`].
    pub fn handle_request(
        &self,
        device_id: &str,
        action: &str,
        request: &Payload,
        response: &mut Payload,
    ) -> bool {
        if !self.core.is_addressed_to(device_id) {
            tracing::trace!(device_id, own_id = %self.core.id(), "request for another device");
            return false;
        }
        route(
            &[&self.power, &self.capabilities],
            self.core.id(),
            action,
            request,
            response,
        )
    }

    /// Report the measured temperature, caused by a periodic poll.
    ///
    /// `humidity` is sent as-is, or as [`HUMIDITY_UNAVAILABLE`] when `None`.
    pub fn send_temperature_event(&self, temperature: f32, humidity: Option<f32>) -> bool {
        self.send_temperature_event_with_cause(temperature, humidity, Cause::periodic_poll())
    }

    /// Report the measured temperature with an explicit cause.
    pub fn send_temperature_event_with_cause(
        &self,
        temperature: f32,
        humidity: Option<f32>,
        cause: impl Into<Cause>,
    ) -> bool {
        let mut event = self.core.prepare_event(EVENT_CURRENT_TEMPERATURE, cause.into());
        let value = event.value_mut();
        value.insert_f32(FIELD_HUMIDITY, humidity.unwrap_or(HUMIDITY_UNAVAILABLE));
        value.insert_f32(FIELD_TEMPERATURE, round_to_tenth(temperature));
        self.core.send_event(event)
    }

    /// Report a target temperature change made on the device itself.
    pub fn send_target_temperature_event(&self, temperature: f32) -> bool {
        self.send_target_temperature_event_with_cause(temperature, Cause::physical_interaction())
    }

    /// Report a target temperature change with an explicit cause.
    pub fn send_target_temperature_event_with_cause(
        &self,
        temperature: f32,
        cause: impl Into<Cause>,
    ) -> bool {
        let mut event = self.core.prepare_event(EVENT_TARGET_TEMPERATURE, cause.into());
        event
            .value_mut()
            .insert_f32(FIELD_TEMPERATURE, round_to_tenth(temperature));
        self.core.send_event(event)
    }

    /// Report a mode change made on the device itself.
    pub fn send_thermostat_mode_event(&self, mode: &str) -> bool {
        self.send_thermostat_mode_event_with_cause(mode, Cause::physical_interaction())
    }

    /// Report a mode change with an explicit cause.
    pub fn send_thermostat_mode_event_with_cause(&self, mode: &str, cause: impl Into<Cause>) -> bool {
        let mut event = self.core.prepare_event(EVENT_SET_THERMOSTAT_MODE, cause.into());
        event.value_mut().insert_str(FIELD_THERMOSTAT_MODE, mode);
        self.core.send_event(event)
    }

    /// Report a power change made on the device itself.
    pub fn send_power_state_event(&self, state: bool) -> bool {
        self.core
            .send_power_state_event(state, Cause::physical_interaction())
    }

    /// Report a power change with an explicit cause.
    pub fn send_power_state_event_with_cause(&self, state: bool, cause: impl Into<Cause>) -> bool {
        self.core.send_power_state_event(state, cause.into())
    }
}

impl<S: EventSink + Send + Sync> Device for Thermostat<S> {
    fn device_id(&self) -> &DeviceId {
        self.id()
    }

    fn handle_request(
        &self,
        device_id: &str,
        action: &str,
        request: &Payload,
        response: &mut Payload,
    ) -> bool {
        Thermostat::handle_request(self, device_id, action, request, response)
    }
}
