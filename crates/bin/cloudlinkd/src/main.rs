//! # cloudlinkd, the cloudlink daemon
//!
//! Composition root that wires the virtual thermostats to a JSON-lines
//! transport on stdio.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Install the `tracing` subscriber (logs go to stderr)
//! - Build one virtual thermostat per configured device on a shared event queue
//! - Read request messages from stdin, one JSON document per line, and write
//!   the response messages to stdout
//! - Drain the event queue to stdout
//! - Emit periodic temperature reports
//! - Stop on end of input or Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::time::Duration;

use cloudlink_adapter_virtual::{VirtualIntegration, VirtualThermostat};
use cloudlink_app::event_queue::EventQueue;
use cloudlink_app::registry::DeviceRegistry;
use cloudlink_app::thermostat::Thermostat;
use cloudlink_domain::event::EventMessage;
use cloudlink_domain::id::DeviceId;
use cloudlink_domain::message::{RequestMessage, ResponseMessage};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    let filter = EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {:?}: {err}", config.logging.filter);
        EnvFilter::new("info")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Devices
    let (queue, mut events) = EventQueue::new();
    let mut integration = VirtualIntegration::new();
    for device in &config.devices {
        let id = DeviceId::new(device.id.clone())?;
        let thermostat =
            Thermostat::new(id, queue.clone()).with_event_wait_time(config.event_wait_time());
        integration.add(VirtualThermostat::new(thermostat, device.initial_temperature));
        tracing::info!(device_id = %device.id, name = %device.name, "virtual thermostat ready");
    }

    let mut registry = DeviceRegistry::new();
    integration.register_all(&mut registry)?;

    tracing::info!(
        devices = registry.len(),
        integration = integration.name(),
        "cloudlinkd reading requests from stdin"
    );

    let mut stdout = tokio::io::stdout();
    serve(
        &registry,
        &integration,
        &mut events,
        BufReader::new(tokio::io::stdin()),
        &mut stdout,
        config.poll_interval(),
        tokio::signal::ctrl_c(),
    )
    .await
}

/// Run the transport loop until end of input or `shutdown` completes, then
/// flush the events still queued.
async fn serve<R, W, F>(
    registry: &DeviceRegistry,
    integration: &VirtualIntegration<EventQueue>,
    events: &mut UnboundedReceiver<EventMessage>,
    input: R,
    output: &mut W,
    poll_interval: Duration,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    F: Future,
{
    let mut lines = input.lines();
    let mut poll = tokio::time::interval(poll_interval);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::info!("end of input");
                    break;
                };
                if let Some(response) = handle_line(registry, &line) {
                    write_json(output, &response).await?;
                }
            }
            Some(event) = events.recv() => {
                write_json(output, &event).await?;
            }
            _ = poll.tick() => {
                let sent = integration.poll_all();
                tracing::debug!(sent, "periodic temperature reports");
            }
            _ = &mut shutdown => {
                tracing::info!("shutdown requested");
                break;
            }
        }
    }

    while let Ok(event) = events.try_recv() {
        write_json(output, &event).await?;
    }
    Ok(())
}

/// Decode one request line and dispatch it.
///
/// Blank lines are skipped; malformed lines are logged and skipped.
fn handle_line(registry: &DeviceRegistry, line: &str) -> Option<ResponseMessage> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str::<RequestMessage>(line) {
        Ok(request) => Some(registry.dispatch(&request)),
        Err(err) => {
            tracing::warn!(%err, "ignoring malformed request line");
            None
        }
    }
}

async fn write_json<W, T>(out: &mut W, value: &T) -> Result<(), Box<dyn std::error::Error>>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut buf = serde_json::to_vec(value)?;
    buf.push(b'\n');
    out.write_all(&buf).await?;
    out.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> (DeviceRegistry, UnboundedReceiver<EventMessage>) {
        let (queue, rx) = EventQueue::new();
        let thermostat = Thermostat::new(DeviceId::new("t1").unwrap(), queue)
            .with_event_wait_time(Duration::ZERO);
        let mut registry = DeviceRegistry::new();
        registry
            .register(VirtualThermostat::new(thermostat, 21.0))
            .unwrap();
        (registry, rx)
    }

    #[test]
    fn should_skip_blank_lines() {
        let (registry, _rx) = registry();
        assert!(handle_line(&registry, "   ").is_none());
    }

    #[test]
    fn should_skip_malformed_lines() {
        let (registry, _rx) = registry();
        assert!(handle_line(&registry, "{not json").is_none());
        assert!(handle_line(&registry, r#"{"payload":{}}"#).is_none());
    }

    #[test]
    fn should_dispatch_request_line() {
        let (registry, _rx) = registry();
        let line = r#"{"payload":{"action":"setThermostatMode","deviceId":"t1","replyToken":"r1","value":{"thermostatMode":"heat"}}}"#;

        let response = handle_line(&registry, line).unwrap();

        assert!(response.payload.success);
        assert_eq!(response.payload.reply_token, "r1");
        assert_eq!(
            response.payload.value.get("thermostatMode"),
            Some(&serde_json::json!("HEAT"))
        );
    }

    #[tokio::test]
    async fn should_write_one_json_document_per_line() {
        let (registry, _rx) = registry();
        let response = handle_line(
            &registry,
            r#"{"payload":{"action":"setPowerState","deviceId":"t1","value":{"state":"On"}}}"#,
        )
        .unwrap();
        let mut out = Vec::new();

        write_json(&mut out, &response).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(value["payload"]["value"]["state"], "On");
    }

    fn integration() -> (
        DeviceRegistry,
        VirtualIntegration<EventQueue>,
        UnboundedReceiver<EventMessage>,
    ) {
        let (queue, rx) = EventQueue::new();
        let mut integration = VirtualIntegration::new();
        let thermostat = Thermostat::new(DeviceId::new("t1").unwrap(), queue)
            .with_event_wait_time(Duration::ZERO);
        integration.add(VirtualThermostat::new(thermostat, 21.0));
        let mut registry = DeviceRegistry::new();
        integration.register_all(&mut registry).unwrap();
        (registry, integration, rx)
    }

    #[tokio::test]
    async fn should_stop_serving_when_shutdown_completes() {
        let (registry, integration, mut events) = integration();
        // Keep the client half alive so stdin never reaches end of input.
        let (_client, server) = tokio::io::duplex(64);
        let mut out = Vec::new();

        let served = tokio::time::timeout(
            Duration::from_secs(5),
            serve(
                &registry,
                &integration,
                &mut events,
                BufReader::new(server),
                &mut out,
                Duration::from_secs(3600),
                std::future::ready(()),
            ),
        )
        .await;

        assert!(served.expect("serve should return").is_ok());
    }

    #[tokio::test]
    async fn should_answer_requests_until_end_of_input() {
        let (registry, integration, mut events) = integration();
        let input: &[u8] = br#"{"payload":{"action":"targetTemperature","deviceId":"t1","replyToken":"r1","value":{"temperature":19.5}}}
"#;
        let mut out = Vec::new();

        serve(
            &registry,
            &integration,
            &mut events,
            input,
            &mut out,
            Duration::from_secs(3600),
            std::future::pending::<()>(),
        )
        .await
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        let response = text
            .lines()
            .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
            .find(|doc| doc["payload"]["type"] == "response")
            .unwrap();
        assert_eq!(response["payload"]["replyToken"], "r1");
        assert_eq!(response["payload"]["success"], true);
        assert_eq!(response["payload"]["value"]["temperature"], 19.5);
    }
}
