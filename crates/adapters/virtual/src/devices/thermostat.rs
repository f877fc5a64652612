//! Virtual thermostat: simulated hardware behind a [`Thermostat`] binding.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cloudlink_app::device::Device;
use cloudlink_app::ports::EventSink;
use cloudlink_app::thermostat::Thermostat;
use cloudlink_domain::id::DeviceId;
use cloudlink_domain::payload::Payload;

/// Modes the simulated hardware accepts.
pub const SUPPORTED_MODES: [&str; 5] = ["AUTO", "COOL", "HEAT", "ECO", "OFF"];

/// Snapshot of the simulated hardware.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermostatState {
    pub power: bool,
    pub target_temperature: f32,
    pub mode: String,
    pub current_temperature: f32,
    pub humidity: Option<f32>,
}

impl ThermostatState {
    fn new(initial_temperature: f32) -> Self {
        Self {
            power: false,
            target_temperature: initial_temperature,
            mode: "AUTO".to_string(),
            current_temperature: initial_temperature,
            humidity: None,
        }
    }
}

/// A simulated thermostat.
///
/// Cloud actions update the simulated state through the registered
/// callbacks; the `turn_dial`, `select_mode` and `press_power` methods model
/// someone operating the device and report the change as an event.
pub struct VirtualThermostat<S> {
    thermostat: Thermostat<S>,
    state: Arc<Mutex<ThermostatState>>,
}

impl<S: EventSink> VirtualThermostat<S> {
    /// Wire the simulated hardware into `thermostat`'s callbacks.
    ///
    /// Any callbacks already registered on `thermostat` are replaced.
    pub fn new(mut thermostat: Thermostat<S>, initial_temperature: f32) -> Self {
        let state = Arc::new(Mutex::new(ThermostatState::new(initial_temperature)));

        let s = Arc::clone(&state);
        thermostat.on_power_state(move |device_id, power| {
            lock(&s).power = *power;
            tracing::info!(%device_id, power = *power, "power state set");
            true
        });

        let s = Arc::clone(&state);
        thermostat.on_target_temperature(move |device_id, temperature| {
            lock(&s).target_temperature = *temperature;
            tracing::info!(%device_id, temperature = *temperature, "target temperature set");
            true
        });

        let s = Arc::clone(&state);
        thermostat.on_adjust_target_temperature(move |device_id, delta| {
            let mut st = lock(&s);
            st.target_temperature += *delta;
            tracing::info!(%device_id, delta = *delta, target = st.target_temperature, "target temperature adjusted");
            // Echo the resulting absolute target.
            *delta = st.target_temperature;
            true
        });

        let s = Arc::clone(&state);
        thermostat.on_thermostat_mode(move |device_id, mode| {
            let Some(normalized) = normalize_mode(mode) else {
                tracing::warn!(%device_id, %mode, "unsupported thermostat mode");
                return false;
            };
            lock(&s).mode.clone_from(&normalized);
            tracing::info!(%device_id, mode = %normalized, "thermostat mode set");
            *mode = normalized;
            true
        });

        Self { thermostat, state }
    }

    /// The underlying binding.
    #[must_use]
    pub fn thermostat(&self) -> &Thermostat<S> {
        &self.thermostat
    }

    #[must_use]
    pub fn id(&self) -> &DeviceId {
        self.thermostat.id()
    }

    /// Current simulated state.
    #[must_use]
    pub fn state(&self) -> ThermostatState {
        lock(&self.state).clone()
    }

    /// Record a new sensor reading.
    pub fn set_reading(&self, temperature: f32, humidity: Option<f32>) {
        let mut st = lock(&self.state);
        st.current_temperature = temperature;
        st.humidity = humidity;
    }

    /// Report the current reading as a periodic `currentTemperature` event.
    pub fn poll(&self) -> bool {
        let (temperature, humidity) = {
            let st = lock(&self.state);
            (st.current_temperature, st.humidity)
        };
        self.thermostat.send_temperature_event(temperature, humidity)
    }

    /// Turn the dial by `delta` degrees and report the new target.
    pub fn turn_dial(&self, delta: f32) -> bool {
        let target = {
            let mut st = lock(&self.state);
            st.target_temperature += delta;
            st.target_temperature
        };
        self.thermostat.send_target_temperature_event(target)
    }

    /// Select a mode on the device and report it.
    ///
    /// Returns `false` without changing anything if the mode is unsupported.
    pub fn select_mode(&self, mode: &str) -> bool {
        let Some(normalized) = normalize_mode(mode) else {
            return false;
        };
        lock(&self.state).mode.clone_from(&normalized);
        self.thermostat.send_thermostat_mode_event(&normalized)
    }

    /// Toggle power on the device and report it.
    pub fn press_power(&self) -> bool {
        let power = {
            let mut st = lock(&self.state);
            st.power = !st.power;
            st.power
        };
        self.thermostat.send_power_state_event(power)
    }
}

impl<S: EventSink + Send + Sync> Device for VirtualThermostat<S> {
    fn device_id(&self) -> &DeviceId {
        self.thermostat.id()
    }

    fn handle_request(
        &self,
        device_id: &str,
        action: &str,
        request: &Payload,
        response: &mut Payload,
    ) -> bool {
        self.thermostat
            .handle_request(device_id, action, request, response)
    }
}

fn normalize_mode(mode: &str) -> Option<String> {
    let upper = mode.to_uppercase();
    SUPPORTED_MODES.contains(&upper.as_str()).then_some(upper)
}

fn lock(state: &Mutex<ThermostatState>) -> MutexGuard<'_, ThermostatState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
