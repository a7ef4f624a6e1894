//! Metrics for rating updates and historical replays
//!
//! Counters live in a Prometheus registry and can be rendered in the text
//! exposition format for scraping or for printing after a CLI run.

pub mod collector;

pub use collector::ReplayMetrics;

use anyhow::Result;
use prometheus::{Encoder, TextEncoder};

impl ReplayMetrics {
    /// Render every registered metric in Prometheus text format
    pub fn render(&self) -> Result<String> {
        let metric_families = self.registry().gather();
        let encoder = TextEncoder::new();
        Ok(encoder.encode_to_string(&metric_families)?)
    }
}
