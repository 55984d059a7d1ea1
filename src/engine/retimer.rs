use crate::core::{ChannelIndex, RetimedSample};
use crate::error::PipelineError;
use crate::visualization::ChannelState;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;

/// Re-spaces one channel's burst of amplitudes onto a periodic virtual clock.
///
/// One instance serves exactly one channel of one batch and never restarts.
/// The clock starts at "now" when `run` begins: the first tick fires
/// immediately, so emission k lands at roughly t0 + k * tick_interval.
pub struct VirtualClockRetimer {
    channel: ChannelIndex,
    sample_rate: usize,
    tick_interval: Duration,
    state: Arc<Mutex<ChannelState>>,
}

impl VirtualClockRetimer {
    pub fn new(
        channel: ChannelIndex,
        sample_rate: usize,
        tick_interval: Duration,
        state: Arc<Mutex<ChannelState>>,
    ) -> Self {
        Self {
            channel,
            sample_rate,
            tick_interval,
            state,
        }
    }

    /// Pair each amplitude with a tick, emitting at most
    /// min(sample_rate, amplitudes.len()) samples. Excess amplitudes are
    /// dropped silently; a short sequence ends early without error.
    pub async fn run(
        self,
        amplitudes: Vec<f64>,
        out: mpsc::Sender<RetimedSample>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), PipelineError> {
        let budget = self.sample_rate.min(amplitudes.len());
        let mut ticker = tokio::time::interval(self.tick_interval);

        for amplitude in amplitudes.into_iter().take(budget) {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.recv() => return Ok(()),
            }

            if !amplitude.is_finite() {
                return Err(PipelineError::RetimerFault {
                    channel: self.channel.get(),
                    reason: format!("non-finite amplitude {amplitude}"),
                });
            }

            let now = Instant::now();
            {
                let mut state = self.state.lock().unwrap();
                state.append(now, amplitude);
            }

            let sample = RetimedSample {
                amplitude,
                channel: self.channel,
                timestamp: now,
            };
            if out.send(sample).await.is_err() {
                // Downstream gone, nothing left to emit to
                break;
            }
        }

        Ok(())
    }
}
