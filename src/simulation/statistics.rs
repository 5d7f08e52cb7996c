//! Statistics collection and reporting
//!
//! Counters accumulated by the driver over one run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::device::{MoveOutcome, TickReport};
use crate::reporting::ReportOutcome;

/// Counters for one simulation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Devices in the fleet at the start of the run
    pub devices: usize,
    /// Devices lost to failed tasks
    pub devices_retired: usize,
    /// Steps fully completed
    pub steps_completed: usize,

    /// Departures toward a new target
    pub departures: usize,
    /// Arrivals at a target
    pub arrivals: usize,

    /// Samples buffered by ticks (initial samples excluded)
    pub samples_buffered: usize,
    /// Flushes triggered
    pub flushes: usize,
    /// Batches that reached the endpoint
    pub batches_delivered: usize,
    /// Batches discarded for lack of a token
    pub batches_skipped: usize,
    /// Batches discarded after a failed POST
    pub batches_failed: usize,
    /// Samples in delivered batches
    pub samples_delivered: usize,
    /// Samples in skipped or failed batches
    pub samples_dropped: usize,
    /// Samples the endpoint reported as accepted
    pub samples_accepted: usize,
    /// Samples the endpoint reported as rejected
    pub samples_rejected: usize,
    /// Samples still buffered when the run ended
    pub samples_pending: usize,
    /// Token fetches
    pub tokens_fetched: usize,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl RunStatistics {
    /// Empty statistics for a fleet of `devices`
    pub fn new(devices: usize) -> Self {
        Self { devices, ..Default::default() }
    }

    /// Fold one device tick into the counters
    pub fn record_tick(&mut self, report: &TickReport) {
        match report.movement {
            MoveOutcome::Departed => self.departures += 1,
            MoveOutcome::Arrived => self.arrivals += 1,
            MoveOutcome::Stayed | MoveOutcome::Advanced => {}
        }

        if report.pushed {
            self.samples_buffered += 1;
        }

        let Some(flush) = report.flush else {
            return;
        };

        self.flushes += 1;
        if flush.token_fetched {
            self.tokens_fetched += 1;
        }

        match flush.outcome {
            ReportOutcome::Delivered { samples, accepted, rejected } => {
                self.batches_delivered += 1;
                self.samples_delivered += samples;
                self.samples_accepted += accepted;
                self.samples_rejected += rejected;
            }
            ReportOutcome::Skipped { samples } => {
                self.batches_skipped += 1;
                self.samples_dropped += samples;
            }
            ReportOutcome::Failed { samples } => {
                self.batches_failed += 1;
                self.samples_dropped += samples;
            }
        }
    }

    /// Share of flushed batches that reached the endpoint, in percent
    pub fn delivery_percentage(&self) -> f64 {
        if self.flushes == 0 {
            0.0
        } else {
            (self.batches_delivered as f64 / self.flushes as f64) * 100.0
        }
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "Run Summary: {} devices | {} steps | {} flushes ({:.1}% delivered) | {} samples delivered, {} dropped, {} pending",
            self.devices,
            self.steps_completed,
            self.flushes,
            self.delivery_percentage(),
            self.samples_delivered,
            self.samples_dropped,
            self.samples_pending
        )
    }

    /// Multi-line report printed at the end of a run
    pub fn generate_summary_report(&self) -> String {
        let mut report = String::new();
        report.push_str("=== Simulation Run Statistics ===\n");
        report.push_str(&format!("Devices: {} ({} retired)\n", self.devices, self.devices_retired));
        report.push_str(&format!("Steps completed: {}\n", self.steps_completed));
        report.push_str(&format!("Duration: {:.2}s\n\n", self.duration.as_secs_f64()));

        report.push_str("Movement:\n");
        report.push_str(&format!("  • Departures: {}\n", self.departures));
        report.push_str(&format!("  • Arrivals: {}\n", self.arrivals));
        report.push_str(&format!("  • Samples buffered: {}\n\n", self.samples_buffered));

        report.push_str("Reporting:\n");
        report.push_str(&format!(
            "  • Flushes: {} ({} delivered, {} skipped, {} failed)\n",
            self.flushes, self.batches_delivered, self.batches_skipped, self.batches_failed
        ));
        report.push_str(&format!(
            "  • Samples delivered: {} ({} accepted, {} rejected)\n",
            self.samples_delivered, self.samples_accepted, self.samples_rejected
        ));
        report.push_str(&format!("  • Samples dropped: {}\n", self.samples_dropped));
        report.push_str(&format!("  • Samples pending at exit: {}\n", self.samples_pending));
        report.push_str(&format!("  • Tokens fetched: {}\n", self.tokens_fetched));
        report
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.generate_summary_report())
    }
}
