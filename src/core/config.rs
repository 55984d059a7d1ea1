use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// What to do with the previous batch's retimer instances when a new batch
/// arrives before they have drained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationPolicy {
    /// Let generations for the same channel run side by side. Matches the
    /// original live-visualization behavior; timestamps for one channel may
    /// interleave when batches arrive faster than one drain period.
    #[default]
    Overlap,
    /// Cancel the previous generation for every channel before spawning the
    /// new one, so each channel has at most one retimer running.
    Restart,
}

/// Pipeline configuration, fixed at construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Number of channels every batch must carry
    pub channels: usize,

    /// Maximum samples emitted per channel per batch (Hz)
    pub sample_rate: usize,

    /// Time window one batch is spread over, in milliseconds
    pub buffer_time_ms: u64,

    /// Capacity of the merged sample channel between retimers and the sink
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    #[serde(default)]
    pub generation_policy: GenerationPolicy,

    /// Rendering delay for the chart collaborator; has no effect on retiming
    #[serde(default = "default_plot_delay_ms")]
    pub plot_delay_ms: u64,
}

fn default_channel_capacity() -> usize {
    100
}

fn default_plot_delay_ms() -> u64 {
    1000
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            channels: 8,
            sample_rate: 250,
            buffer_time_ms: 1000,
            channel_capacity: default_channel_capacity(),
            generation_policy: GenerationPolicy::default(),
            plot_delay_ms: default_plot_delay_ms(),
        }
    }
}

impl StreamConfig {
    pub fn new(channels: usize, sample_rate: usize, buffer_time_ms: u64) -> Self {
        Self {
            channels,
            sample_rate,
            buffer_time_ms,
            ..Self::default()
        }
    }

    /// Parse a configuration from a JSON value
    pub fn from_json(config: Value) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_value(config)?;
        config.validate()?;
        Ok(config)
    }

    /// Spacing between successive virtual-clock ticks: buffer time divided
    /// by sample rate (1000 ms at 250 Hz gives 4 ms)
    pub fn tick_interval(&self) -> Duration {
        Duration::from_micros(self.buffer_time_ms * 1000 / self.sample_rate as u64)
    }

    /// How long the per-channel rolling buffer retains points
    pub fn rolling_window(&self) -> Duration {
        Duration::from_millis(self.buffer_time_ms + self.plot_delay_ms)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.channels == 0 {
            return Err(PipelineError::InvalidConfig(
                "channels must be at least 1".to_string(),
            ));
        }
        if self.sample_rate == 0 {
            return Err(PipelineError::InvalidConfig(
                "sample_rate must be greater than 0".to_string(),
            ));
        }
        if self.buffer_time_ms == 0 {
            return Err(PipelineError::InvalidConfig(
                "buffer_time_ms must be greater than 0".to_string(),
            ));
        }
        if self.tick_interval().is_zero() {
            return Err(PipelineError::InvalidConfig(format!(
                "tick interval underflows: buffer_time_ms {} too small for sample_rate {}",
                self.buffer_time_ms, self.sample_rate
            )));
        }
        if self.channel_capacity == 0 {
            return Err(PipelineError::InvalidConfig(
                "channel_capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
