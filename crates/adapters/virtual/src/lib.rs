//! # cloudlink-adapter-virtual
//!
//! Virtual/demo integration providing simulated thermostats for testing and
//! demonstration purposes.
//!
//! ## Behaviour
//!
//! | Action | Effect on the simulated hardware |
//! |--------|----------------------------------|
//! | `setPowerState` | Stores the power flag |
//! | `targetTemperature` | Stores the target |
//! | `adjustTargetTemperature` | Adds the delta, answers with the new target |
//! | `setThermostatMode` | Accepts `AUTO`, `COOL`, `HEAT`, `ECO`, `OFF` (any case) |
//!
//! ## Dependency rule
//!
//! Depends on `cloudlink-app` (port traits, bindings) and `cloudlink-domain` only.

mod devices;

use std::sync::Arc;

use cloudlink_app::ports::EventSink;
use cloudlink_app::registry::DeviceRegistry;
use cloudlink_domain::error::CloudLinkError;

pub use devices::{SUPPORTED_MODES, ThermostatState, VirtualThermostat};

/// Virtual integration owning a set of simulated thermostats.
pub struct VirtualIntegration<S> {
    thermostats: Vec<Arc<VirtualThermostat<S>>>,
}

impl<S> Default for VirtualIntegration<S> {
    fn default() -> Self {
        Self {
            thermostats: Vec::new(),
        }
    }
}

impl<S: EventSink + Send + Sync + 'static> VirtualIntegration<S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Unique name identifying this integration.
    #[must_use]
    pub fn name(&self) -> &'static str {
        "virtual"
    }

    /// Take ownership of a thermostat and return a shared handle to it.
    pub fn add(&mut self, thermostat: VirtualThermostat<S>) -> Arc<VirtualThermostat<S>> {
        let thermostat = Arc::new(thermostat);
        self.thermostats.push(Arc::clone(&thermostat));
        thermostat
    }

    /// Register every thermostat with `registry`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a thermostat id is already registered.
    pub fn register_all(&self, registry: &mut DeviceRegistry) -> Result<(), CloudLinkError> {
        for thermostat in &self.thermostats {
            registry.register(Arc::clone(thermostat))?;
        }
        Ok(())
    }

    /// Emit a periodic reading for every thermostat; returns how many were sent.
    pub fn poll_all(&self) -> usize {
        self.thermostats.iter().filter(|t| t.poll()).count()
    }

    /// Find a thermostat by device id.
    #[must_use]
    pub fn get(&self, device_id: &str) -> Option<&Arc<VirtualThermostat<S>>> {
        self.thermostats.iter().find(|t| *t.id() == device_id)
    }
}
