//! Request and response messages exchanged with the cloud.
//!
//! A request names an action for one device; the response echoes the
//! request's `replyToken` and `clientId` so the cloud can correlate the two.

use serde::{Deserialize, Serialize};

use crate::payload::Payload;
use crate::time::unix_timestamp;

/// Payload format version carried in every header.
pub const PAYLOAD_VERSION: u32 = 2;
/// Signature format version carried in every header.
pub const SIGNATURE_VERSION: u32 = 1;

/// Message header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub payload_version: u32,
    pub signature_version: u32,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            payload_version: PAYLOAD_VERSION,
            signature_version: SIGNATURE_VERSION,
        }
    }
}

/// Discriminates the three message kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Request,
    Response,
    Event,
}

/// An inbound action request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestMessage {
    #[serde(default)]
    pub header: Header,
    pub payload: RequestPayload,
}

/// Body of a [`RequestMessage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPayload {
    pub action: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub created_at: i64,
    pub device_id: String,
    #[serde(default)]
    pub reply_token: String,
    #[serde(rename = "type", default)]
    pub kind: MessageType,
    #[serde(default)]
    pub value: Payload,
}

impl RequestMessage {
    /// Build a request for `action` on `device_id`, stamped with the current time.
    #[must_use]
    pub fn new(device_id: impl Into<String>, action: impl Into<String>, value: Payload) -> Self {
        Self {
            header: Header::default(),
            payload: RequestPayload {
                action: action.into(),
                client_id: String::new(),
                created_at: unix_timestamp(),
                device_id: device_id.into(),
                reply_token: uuid::Uuid::new_v4().to_string(),
                kind: MessageType::Request,
                value,
            },
        }
    }
}

/// An outbound response to a [`RequestMessage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub header: Header,
    pub payload: ResponsePayload,
}

/// Body of a [`ResponseMessage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePayload {
    pub action: String,
    pub client_id: String,
    pub created_at: i64,
    pub device_id: String,
    pub message: String,
    pub reply_token: String,
    pub success: bool,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub value: Payload,
}

impl ResponseMessage {
    /// Build the response to `request`, echoing its correlation fields.
    #[must_use]
    pub fn for_request(
        request: &RequestMessage,
        success: bool,
        message: impl Into<String>,
        value: Payload,
    ) -> Self {
        let req = &request.payload;
        Self {
            header: Header::default(),
            payload: ResponsePayload {
                action: req.action.clone(),
                client_id: req.client_id.clone(),
                created_at: unix_timestamp(),
                device_id: req.device_id.clone(),
                message: message.into(),
                reply_token: req.reply_token.clone(),
                success,
                kind: MessageType::Response,
                value,
            },
        }
    }
}
