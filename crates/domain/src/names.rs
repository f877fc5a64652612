//! Fixed action, event and field names.
//!
//! These strings are part of the wire contract with the cloud and must not
//! change.

/// Action: set the absolute target temperature.
pub const ACTION_TARGET_TEMPERATURE: &str = "targetTemperature";
/// Action: adjust the target temperature by a delta.
pub const ACTION_ADJUST_TARGET_TEMPERATURE: &str = "adjustTargetTemperature";
/// Action: set the thermostat mode.
pub const ACTION_SET_THERMOSTAT_MODE: &str = "setThermostatMode";
/// Action: switch the device on or off.
pub const ACTION_SET_POWER_STATE: &str = "setPowerState";

/// Event: periodic temperature (and humidity) report.
pub const EVENT_CURRENT_TEMPERATURE: &str = "currentTemperature";
/// Event: the target temperature changed.
pub const EVENT_TARGET_TEMPERATURE: &str = "targetTemperature";
/// Event: the thermostat mode changed.
pub const EVENT_SET_THERMOSTAT_MODE: &str = "setThermostatMode";
/// Event: the power state changed.
pub const EVENT_SET_POWER_STATE: &str = "setPowerState";

/// Payload field carrying a temperature or a temperature delta.
pub const FIELD_TEMPERATURE: &str = "temperature";
/// Payload field carrying a relative humidity.
pub const FIELD_HUMIDITY: &str = "humidity";
/// Payload field carrying the thermostat mode.
pub const FIELD_THERMOSTAT_MODE: &str = "thermostatMode";
/// Payload field carrying the power state (`"On"` / `"Off"`).
pub const FIELD_STATE: &str = "state";

/// Wire value for a powered-on device.
pub const POWER_ON: &str = "On";
/// Wire value for a powered-off device.
pub const POWER_OFF: &str = "Off";
