use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one pipeline instance
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    batches_received: AtomicU64,
    samples_emitted: AtomicU64,
    malformed_batches: AtomicU64,
    retimer_faults: AtomicU64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches_received(&self) -> u64 {
        self.batches_received.load(Ordering::Relaxed)
    }

    pub fn samples_emitted(&self) -> u64 {
        self.samples_emitted.load(Ordering::Relaxed)
    }

    pub fn malformed_batches(&self) -> u64 {
        self.malformed_batches.load(Ordering::Relaxed)
    }

    pub fn retimer_faults(&self) -> u64 {
        self.retimer_faults.load(Ordering::Relaxed)
    }

    pub fn record_batch(&self) {
        self.batches_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sample(&self) {
        self.samples_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malformed_batch(&self) {
        self.malformed_batches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retimer_fault(&self) {
        self.retimer_faults.fetch_add(1, Ordering::Relaxed);
    }
}
