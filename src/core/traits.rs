use super::{Batch, ChannelIndex};
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Push-based batch producer boundary
///
/// `subscribe` registers a listener and hands back the batch stream.
/// Dropping the receiver releases the listener; the source makes no
/// buffering or redelivery guarantee beyond the channel capacity.
#[async_trait]
pub trait SampleSource: Send {
    async fn subscribe(&mut self) -> Result<mpsc::Receiver<Batch>>;
}

/// Downstream consumer boundary
///
/// Invoked once per retimed sample, in emission order: within a channel
/// strictly ordered, across channels interleaved.
#[async_trait]
pub trait SampleSink: Send {
    async fn on_sample(&mut self, amplitude: f64, channel: ChannelIndex) -> Result<()>;
}
