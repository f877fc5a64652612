//! Event messages: outbound notifications describing a state change.
//!
//! Every event shares one envelope; only the `value` object differs between
//! event kinds:
//!
//! ```json
//! {
//!   "header": {"payloadVersion": 2, "signatureVersion": 1},
//!   "payload": {
//!     "action": "currentTemperature",
//!     "cause": {"type": "PERIODIC_POLL"},
//!     "createdAt": 1700000000,
//!     "deviceId": "...",
//!     "replyToken": "...",
//!     "type": "event",
//!     "value": {"humidity": -1.0, "temperature": 21.4}
//!   }
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::id::DeviceId;
use crate::message::{Header, MessageType};
use crate::payload::Payload;
use crate::time::unix_timestamp;

/// Why an event fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    #[serde(rename = "type")]
    kind: String,
}

impl Cause {
    /// Scheduled report.
    pub const PERIODIC_POLL: &'static str = "PERIODIC_POLL";
    /// Someone operated the device directly.
    pub const PHYSICAL_INTERACTION: &'static str = "PHYSICAL_INTERACTION";

    /// A cause with an arbitrary tag.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }

    #[must_use]
    pub fn periodic_poll() -> Self {
        Self::new(Self::PERIODIC_POLL)
    }

    #[must_use]
    pub fn physical_interaction() -> Self {
        Self::new(Self::PHYSICAL_INTERACTION)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.kind
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.kind)
    }
}

impl From<&str> for Cause {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

impl From<String> for Cause {
    fn from(kind: String) -> Self {
        Self::new(kind)
    }
}

/// An outbound event envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMessage {
    pub header: Header,
    pub payload: EventPayload,
}

/// Body of an [`EventMessage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub action: String,
    pub cause: Cause,
    pub created_at: i64,
    pub device_id: String,
    pub reply_token: Uuid,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub value: Payload,
}

impl EventMessage {
    /// A fresh envelope for `action` on `device_id` with an empty value object.
    #[must_use]
    pub fn new(device_id: &DeviceId, action: impl Into<String>, cause: Cause) -> Self {
        Self {
            header: Header::default(),
            payload: EventPayload {
                action: action.into(),
                cause,
                created_at: unix_timestamp(),
                device_id: device_id.to_string(),
                reply_token: Uuid::new_v4(),
                kind: MessageType::Event,
                value: Payload::new(),
            },
        }
    }

    /// The event name.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.payload.action
    }

    /// Mutable access to the value object.
    pub fn value_mut(&mut self) -> &mut Payload {
        &mut self.payload.value
    }
}

/// Quantize a reading to the nearest tenth: `round(value * 10) / 10`.
///
/// The arithmetic stays in `f32` and ties round away from zero, so
/// `0.35_f32` (stored as `0.34999999`) still lands on `0.4`.
#[must_use]
pub fn round_to_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device() -> DeviceId {
        DeviceId::new("thermostat-1").unwrap()
    }

    #[test]
    fn should_round_up_to_nearest_tenth() {
        assert_eq!(round_to_tenth(21.37).to_bits(), 21.4_f32.to_bits());
    }

    #[test]
    fn should_round_down_to_nearest_tenth() {
        assert_eq!(round_to_tenth(21.34).to_bits(), 21.3_f32.to_bits());
    }

    #[test]
    fn should_round_ties_away_from_zero() {
        assert_eq!(round_to_tenth(0.25).to_bits(), 0.3_f32.to_bits());
        assert_eq!(round_to_tenth(-0.25).to_bits(), (-0.3_f32).to_bits());
    }

    #[test]
    fn should_round_with_f32_multiplication() {
        assert_eq!(round_to_tenth(0.35).to_bits(), 0.4_f32.to_bits());
    }

    #[test]
    fn should_build_empty_envelope() {
        let event = EventMessage::new(&device(), "currentTemperature", Cause::periodic_poll());
        assert_eq!(event.action(), "currentTemperature");
        assert_eq!(event.payload.device_id, "thermostat-1");
        assert_eq!(event.payload.cause.as_str(), "PERIODIC_POLL");
        assert_eq!(event.payload.kind, MessageType::Event);
        assert!(event.payload.value.is_empty());
    }

    #[test]
    fn should_use_fresh_reply_token_per_event() {
        let a = EventMessage::new(&device(), "targetTemperature", Cause::physical_interaction());
        let b = EventMessage::new(&device(), "targetTemperature", Cause::physical_interaction());
        assert_ne!(a.payload.reply_token, b.payload.reply_token);
    }

    #[test]
    fn should_serialize_wire_envelope() {
        let mut event = EventMessage::new(&device(), "setThermostatMode", Cause::from("APP"));
        event.value_mut().insert_str("thermostatMode", "COOL");

        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["header"], json!({"payloadVersion": 2, "signatureVersion": 1}));
        assert_eq!(value["payload"]["action"], "setThermostatMode");
        assert_eq!(value["payload"]["cause"], json!({"type": "APP"}));
        assert_eq!(value["payload"]["deviceId"], "thermostat-1");
        assert_eq!(value["payload"]["type"], "event");
        assert_eq!(value["payload"]["value"], json!({"thermostatMode": "COOL"}));
    }

    #[test]
    fn should_roundtrip_through_json() {
        let mut event = EventMessage::new(&device(), "targetTemperature", Cause::periodic_poll());
        event.value_mut().insert_f32("temperature", 21.5);
        let text = serde_json::to_string(&event).unwrap();
        let parsed: EventMessage = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, event);
    }
}
