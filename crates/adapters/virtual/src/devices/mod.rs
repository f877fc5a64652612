//! Virtual device implementations.

mod thermostat;

pub use thermostat::{SUPPORTED_MODES, ThermostatState, VirtualThermostat};
