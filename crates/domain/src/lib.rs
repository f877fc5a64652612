//! # cloudlink-domain
//!
//! Pure domain model for the cloudlink device binding layer.
//!
//! ## Responsibilities
//! - Foundational types: device identity, error conventions, timestamps
//! - Define the **payload** object carried by requests, responses and events,
//!   with typed accessors that spell out their missing-key policy
//! - Define the **wire messages**: request, response and event envelopes
//! - Define the fixed **action and event names** shared with the cloud
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! The outbound transport is expressed as a trait in the `app` crate (port).

pub mod error;
pub mod id;
pub mod time;

pub mod event;
pub mod message;
pub mod names;
pub mod payload;
