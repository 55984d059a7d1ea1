use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::time::Instant;

/// Zero-based channel identity, bounds-checked at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChannelIndex(usize);

impl ChannelIndex {
    /// Create an index validated against the configured channel count
    pub fn new(index: usize, channel_count: usize) -> Result<Self, PipelineError> {
        if index >= channel_count {
            return Err(PipelineError::ChannelOutOfRange {
                index,
                count: channel_count,
            });
        }
        Ok(Self(index))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ChannelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One inbound event payload: one amplitude array per channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    channels: Vec<Vec<f64>>,
}

impl Batch {
    pub fn new(channels: Vec<Vec<f64>>) -> Self {
        Self { channels }
    }

    /// Number of channel arrays this batch actually carries
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn into_channels(self) -> Vec<Vec<f64>> {
        self.channels
    }
}

/// A single amplitude paired with a virtual-clock instant
///
/// Produced only by the retimer; the source never emits timestamps.
#[derive(Debug, Clone, Copy)]
pub struct RetimedSample {
    pub amplitude: f64,
    pub channel: ChannelIndex,
    pub timestamp: Instant,
}
