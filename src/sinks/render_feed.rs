use crate::core::{ChannelIndex, SampleSink};
use anyhow::{anyhow, Result};
use async_trait::async_trait;

/// Sample handed to the render thread
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSample {
    pub amplitude: f64,
    pub channel: usize,
}

/// Bridges the async pipeline to a non-async rendering thread over a
/// crossbeam channel; the chart loop blocks on the receiver at its own pace.
pub struct RenderFeedSink {
    tx: crossbeam_channel::Sender<RenderSample>,
}

impl RenderFeedSink {
    pub fn unbounded() -> (Self, crossbeam_channel::Receiver<RenderSample>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl SampleSink for RenderFeedSink {
    async fn on_sample(&mut self, amplitude: f64, channel: ChannelIndex) -> Result<()> {
        self.tx
            .send(RenderSample {
                amplitude,
                channel: channel.get(),
            })
            .map_err(|_| anyhow!("render feed disconnected"))
    }
}
