use crate::core::{Batch, ChannelIndex};
use crate::error::PipelineError;

/// One channel's share of a batch, in original array order
#[derive(Debug, Clone)]
pub struct ChannelSamples {
    pub channel: ChannelIndex,
    pub amplitudes: Vec<f64>,
}

/// Pure fan-out of one batch into per-channel amplitude sequences
#[derive(Debug, Clone, Copy)]
pub struct ChannelDemultiplexer {
    channels: usize,
}

impl ChannelDemultiplexer {
    pub fn new(channels: usize) -> Self {
        Self { channels }
    }

    /// Split a batch into exactly one sequence per configured channel.
    /// A batch with the wrong number of arrays fails fast; nothing is
    /// truncated or padded.
    pub fn split(&self, batch: Batch) -> Result<Vec<ChannelSamples>, PipelineError> {
        let actual = batch.channel_count();
        if actual != self.channels {
            return Err(PipelineError::MalformedBatch {
                expected: self.channels,
                actual,
            });
        }

        batch
            .into_channels()
            .into_iter()
            .enumerate()
            .map(|(index, amplitudes)| {
                Ok(ChannelSamples {
                    channel: ChannelIndex::new(index, self.channels)?,
                    amplitudes,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_preserves_order() {
        let demux = ChannelDemultiplexer::new(2);
        let batch = Batch::new(vec![vec![1.0, 2.0, 3.0], vec![10.0, 20.0]]);

        let parts = demux.split(batch).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].channel.get(), 0);
        assert_eq!(parts[0].amplitudes, vec![1.0, 2.0, 3.0]);
        assert_eq!(parts[1].channel.get(), 1);
        assert_eq!(parts[1].amplitudes, vec![10.0, 20.0]);
    }

    #[test]
    fn test_split_rejects_wrong_count() {
        let demux = ChannelDemultiplexer::new(2);
        let batch = Batch::new(vec![vec![1.0], vec![2.0], vec![3.0]]);

        match demux.split(batch).unwrap_err() {
            PipelineError::MalformedBatch { expected, actual } => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_split_rejects_empty_batch() {
        let demux = ChannelDemultiplexer::new(1);
        let err = demux.split(Batch::new(Vec::new())).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MalformedBatch {
                expected: 1,
                actual: 0
            }
        ));
    }
}
