//! Scalar summary sinks for training curves.

/// Destination for step-tagged scalar summaries such as `train_reward`.
pub trait SummarySink {
    fn add_scalar(&mut self, tag: &str, value: f64, global_step: u64);

    /// Flush any buffered output.
    fn flush(&mut self) {}
}

/// Emits every scalar as a structured `tracing` event.
#[derive(Debug, Default)]
pub struct TracingSummary;

impl SummarySink for TracingSummary {
    fn add_scalar(&mut self, tag: &str, value: f64, global_step: u64) {
        tracing::info!(target: "summary", tag, value, global_step);
    }
}

/// A single recorded scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    pub tag: String,
    pub value: f64,
    pub global_step: u64,
}

/// Keeps scalars in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySummary {
    pub scalars: Vec<Scalar>,
    pub flushes: usize,
}

impl MemorySummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values recorded under `tag`.
    pub fn values(&self, tag: &str) -> Vec<f64> {
        self.scalars
            .iter()
            .filter(|s| s.tag == tag)
            .map(|s| s.value)
            .collect()
    }
}

impl SummarySink for MemorySummary {
    fn add_scalar(&mut self, tag: &str, value: f64, global_step: u64) {
        self.scalars.push(Scalar {
            tag: tag.to_string(),
            value,
            global_step,
        });
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}
