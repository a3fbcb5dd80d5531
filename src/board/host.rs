use std::io::Write;

use serde::Serialize;

use crate::model::target::Target;

/// Outbound notifications for an embedding host, such as a companion map
/// process. Fire-and-forget; no acknowledgement exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum HostEvent {
    /// A status change was confirmed by the backend.
    #[serde(rename = "updateMapPin")]
    UpdateMapPin { target: Target },
    /// The user asked to locate a target on the host's map.
    #[serde(rename = "locateTarget")]
    LocateTarget { data: LocatePayload },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocatePayload {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
}

/// The port the core posts host events through. Production wires a JSONL
/// sink; tests record and assert.
pub trait HostPort {
    fn post(&mut self, event: HostEvent);
}

/// Discards events (standalone use, no embedding host).
#[derive(Debug, Default)]
pub struct NullHost;

impl HostPort for NullHost {
    fn post(&mut self, event: HostEvent) {
        log::debug!("host event (no host attached): {event:?}");
    }
}

/// Writes one JSON object per line, suitable for a host process reading a
/// pipe or file. Write failures are logged and dropped, matching the
/// fire-and-forget contract.
pub struct JsonlHost<W: Write> {
    writer: W,
}

impl<W: Write> JsonlHost<W> {
    pub fn new(writer: W) -> Self {
        JsonlHost { writer }
    }
}

impl<W: Write> HostPort for JsonlHost<W> {
    fn post(&mut self, event: HostEvent) {
        match serde_json::to_string(&event) {
            Ok(line) => {
                if let Err(e) = writeln!(self.writer, "{line}").and_then(|_| self.writer.flush()) {
                    log::warn!("failed to write host event: {e}");
                }
            }
            Err(e) => log::warn!("failed to serialize host event: {e}"),
        }
    }
}

/// Captures posted events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub events: Vec<HostEvent>,
}

impl HostPort for RecordingHost {
    fn post(&mut self, event: HostEvent) {
        self.events.push(event);
    }
}
