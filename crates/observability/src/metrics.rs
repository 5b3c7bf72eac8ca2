//! Pipeline metric recorders and in-process aggregation

use std::collections::HashMap;

use metrics::{counter, gauge, histogram};

/// Record one entry copy forwarded to a derived channel.
pub fn record_entry_forwarded(channel: &str) {
    counter!(
        "pipeline_entries_forwarded_total",
        "channel" => channel.to_string()
    )
    .increment(1);
}

/// Record one entry acknowledged (deleted from the incoming channel).
pub fn record_entry_acknowledged() {
    counter!("pipeline_entries_acknowledged_total").increment(1);
}

/// Record one completion notification published.
pub fn record_notification_published() {
    counter!("pipeline_notifications_published_total").increment(1);
}

/// Record one batch read from the incoming channel.
pub fn record_batch_received(batch_len: usize) {
    counter!("pipeline_batches_received_total").increment(1);
    gauge!("pipeline_last_batch_size").set(batch_len as f64);
    histogram!("pipeline_batch_size").record(batch_len as f64);
}

/// Record the fan-out latency of one entry (read to acknowledged).
pub fn record_fanout_latency_ms(latency_ms: f64) {
    histogram!("pipeline_fanout_latency_ms").record(latency_ms);
}

/// Record one row upserted by the archival sink.
pub fn record_row_stored(table: &str) {
    counter!(
        "pipeline_rows_stored_total",
        "table" => table.to_string()
    )
    .increment(1);
}

/// Record one submission transcoded and forwarded.
pub fn record_submission_transcoded(form_id: &str) {
    counter!(
        "pipeline_submissions_transcoded_total",
        "form_id" => form_id.to_string()
    )
    .increment(1);
}

/// Distribution statistics aggregator
///
/// Aggregates in memory for run summaries, independent of the Prometheus
/// recorder being installed.
#[derive(Debug, Clone, Default)]
pub struct DistributionStats {
    /// Total batches read
    pub total_batches: u64,

    /// Total entries processed
    pub total_entries: u64,

    /// Total copies forwarded
    pub total_copies: u64,

    /// Fan-out latency statistics (ms)
    pub latency_ms: RunningStats,

    /// Copies per derived channel
    pub copies_per_channel: HashMap<String, u64>,
}

impl DistributionStats {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one batch of processed entries.
    pub fn record_batch(&mut self, entries: usize) {
        self.total_batches += 1;
        self.total_entries += entries as u64;
    }

    /// Record one forwarded copy.
    pub fn record_copy(&mut self, channel: &str) {
        self.total_copies += 1;
        *self
            .copies_per_channel
            .entry(channel.to_string())
            .or_insert(0) += 1;
    }

    /// Record one entry's fan-out latency.
    pub fn record_latency_ms(&mut self, latency_ms: f64) {
        self.latency_ms.push(latency_ms);
    }

    /// Generate a summary report.
    pub fn summary(&self) -> DistributionSummary {
        DistributionSummary {
            total_batches: self.total_batches,
            total_entries: self.total_entries,
            total_copies: self.total_copies,
            copies_per_entry: if self.total_entries > 0 {
                self.total_copies as f64 / self.total_entries as f64
            } else {
                0.0
            },
            latency_ms: self.latency_ms.clone(),
            copies_per_channel: self.copies_per_channel.clone(),
        }
    }

    /// Reset all statistics.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Summary of one distribution session
#[derive(Debug, Clone, Default)]
pub struct DistributionSummary {
    pub total_batches: u64,
    pub total_entries: u64,
    pub total_copies: u64,
    pub copies_per_entry: f64,
    pub latency_ms: RunningStats,
    pub copies_per_channel: HashMap<String, u64>,
}

impl std::fmt::Display for DistributionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Distribution Summary ===")?;
        writeln!(f, "Batches: {}", self.total_batches)?;
        writeln!(f, "Entries: {}", self.total_entries)?;
        writeln!(
            f,
            "Copies: {} ({:.2} per entry)",
            self.total_copies, self.copies_per_entry
        )?;
        writeln!(f, "Fan-out latency (ms): {}", self.latency_ms)?;

        if !self.copies_per_channel.is_empty() {
            writeln!(f, "Copies per channel:")?;
            let mut channels: Vec<_> = self.copies_per_channel.iter().collect();
            channels.sort();
            for (channel, count) in channels {
                writeln!(f, "  {}: {}", channel, count)?;
            }
        }

        Ok(())
    }
}

/// Online statistics (Welford)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    /// Push one sample.
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Sample mean.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample standard deviation.
    pub fn std_dev(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            (self.m2 / (self.count - 1) as f64).sqrt()
        }
    }
}

impl std::fmt::Display for RunningStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min,
                self.max,
                self.mean(),
                self.std_dev(),
                self.count
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();
        for value in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            stats.push(value);
        }
        assert_eq!(stats.count, 8);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        assert!((stats.mean() - 5.0).abs() < 1e-9);
        assert!((stats.std_dev() - 2.138089935).abs() < 1e-6);
    }

    #[test]
    fn test_distribution_stats_summary() {
        let mut stats = DistributionStats::new();
        stats.record_batch(2);
        stats.record_copy("field-data-a");
        stats.record_copy("field-data-a");
        stats.record_copy("field-data-b");
        stats.record_latency_ms(3.0);

        let summary = stats.summary();
        assert_eq!(summary.total_entries, 2);
        assert_eq!(summary.total_copies, 3);
        assert_eq!(summary.copies_per_channel["field-data-a"], 2);
        assert!((summary.copies_per_entry - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_summary_display_handles_empty() {
        let summary = DistributionStats::new().summary();
        let rendered = summary.to_string();
        assert!(rendered.contains("N/A"));
    }
}
