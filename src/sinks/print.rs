use crate::core::{ChannelIndex, SampleSink};
use anyhow::Result;
use async_trait::async_trait;

/// Console sink for demos: one line per retimed sample
pub struct PrintSink {
    label: String,
    count: u64,
}

impl PrintSink {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            count: 0,
        }
    }
}

#[async_trait]
impl SampleSink for PrintSink {
    async fn on_sample(&mut self, amplitude: f64, channel: ChannelIndex) -> Result<()> {
        self.count += 1;
        println!(
            "[{}] #{} ch{}: {:.2}",
            self.label, self.count, channel, amplitude
        );
        Ok(())
    }
}
