//! Application telemetry events and sinks.
//!
//! Telemetry events are structured records of operational signals: which
//! listing fetches landed, which were discarded as stale, and which
//! checkout sessions were opened. They are separate from diagnostic
//! logging, which goes through `tracing` and is configured by
//! [`init_tracing`].

mod subscriber;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use subscriber::{LogFormat, UnknownLogFormat, init_tracing};

use std::io;

use serde::{Deserialize, Serialize};

/// A structured telemetry event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// A fetch completed and its records were applied.
    ListingFetched {
        /// Listing name, e.g. `projects`.
        listing: String,
        /// Generation of the applied fetch.
        generation: u64,
        /// Number of records now shown.
        records: usize,
    },
    /// The latest fetch failed and the listing is in its error state.
    ListingFetchFailed {
        /// Listing name.
        listing: String,
        /// Generation of the failed fetch.
        generation: u64,
        /// Internal error detail.
        message: String,
    },
    /// A superseded fetch completed and was dropped unseen.
    ListingFetchDiscarded {
        /// Listing name.
        listing: String,
        /// Generation of the stale fetch.
        generation: u64,
        /// Generation the listing was waiting for.
        latest: u64,
    },
    /// A checkout session was created with the payment processor.
    CheckoutSessionCreated {
        /// Donation type supplied by the donor.
        donation_type: String,
        /// Charged amount in cents.
        amount_cents: i64,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
///
/// Meant for watching a listing from the terminal; nothing is transmitted.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// Forwards telemetry events to the `tracing` subscriber at `info` level.
///
/// Used by the server, where stderr belongs to the log formatter.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetrySink;

impl TelemetrySink for TracingTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };
        tracing::info!(target: "beam_site::telemetry", event = %serialised, "telemetry");
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::test_support::RecordingTelemetrySink;
    use super::{TelemetryEvent, TelemetrySink};

    #[rstest]
    fn recording_sink_captures_events() {
        let sink = RecordingTelemetrySink::default();
        sink.record(TelemetryEvent::ListingFetched {
            listing: "hubs".to_owned(),
            generation: 1,
            records: 4,
        });

        assert_eq!(
            sink.take(),
            vec![TelemetryEvent::ListingFetched {
                listing: "hubs".to_owned(),
                generation: 1,
                records: 4,
            }]
        );
        assert!(sink.events().is_empty());
    }

    #[rstest]
    fn events_serialise_with_a_type_tag() {
        let event = TelemetryEvent::ListingFetchDiscarded {
            listing: "projects".to_owned(),
            generation: 2,
            latest: 3,
        };

        let value = serde_json::to_value(&event).expect("event should serialise");

        assert_eq!(
            value,
            json!({
                "type": "listing_fetch_discarded",
                "listing": "projects",
                "generation": 2,
                "latest": 3
            })
        );
    }
}
