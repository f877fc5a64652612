//! # cloudlink-app
//!
//! Application layer: device bindings and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **driven/outbound port** adapters implement:
//!   - `EventSink`: accepts event messages for the cloud
//! - Define the **driving/inbound** side:
//!   - `Device`: one addressable device instance handling actions
//!   - `DeviceRegistry`: fans request messages out to registered devices
//! - Provide the building blocks every device kind shares: the base device
//!   core (identity, event preparation, event wait-time filter), the
//!   power-state capability and the staged action router
//! - Provide the `Thermostat` binding
//! - Provide **in-process infrastructure** (event queue) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `cloudlink-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod device;
pub mod event_queue;
pub mod ports;
pub mod registry;
pub mod router;
pub mod thermostat;
