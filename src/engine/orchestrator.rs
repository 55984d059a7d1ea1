use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::core::{
    Batch, GenerationPolicy, RetimedSample, SampleSink, SampleSource, StreamConfig,
};
use crate::engine::demux::ChannelDemultiplexer;
use crate::engine::retimer::VirtualClockRetimer;
use crate::engine::state::PipelineState;
use crate::error::PipelineError;
use crate::observability::PipelineMetrics;
use crate::visualization::ChannelState;

/// Wires source -> demultiplexer -> per-channel retimers -> sink into one
/// live pipeline and owns its lifetime.
///
/// For every inbound batch the dispatcher spawns one retimer task per
/// channel; all retimers send into a single merged channel (mergeMap-style
/// fan-in, no intermediate queue), which a forwarder task drains into the
/// sink. A broadcast channel carries the global shutdown signal.
pub struct PipelineOrchestrator {
    config: StreamConfig,
    source: Box<dyn SampleSource>,
    sink: Option<Box<dyn SampleSink>>,
    demux: ChannelDemultiplexer,
    channel_states: Vec<Arc<Mutex<ChannelState>>>,
    metrics: Arc<PipelineMetrics>,
    state: Arc<Mutex<PipelineState>>,
    shutdown_tx: Option<broadcast::Sender<()>>,
    handles: Vec<JoinHandle<Result<()>>>,
    errors: Option<mpsc::UnboundedReceiver<PipelineError>>,
}

impl PipelineOrchestrator {
    pub fn new(
        config: StreamConfig,
        source: Box<dyn SampleSource>,
        sink: Box<dyn SampleSink>,
    ) -> Result<Self> {
        config.validate()?;

        let channel_states = (0..config.channels)
            .map(|_| Arc::new(Mutex::new(ChannelState::new(config.rolling_window()))))
            .collect();

        Ok(Self {
            demux: ChannelDemultiplexer::new(config.channels),
            config,
            source,
            sink: Some(sink),
            channel_states,
            metrics: Arc::new(PipelineMetrics::new()),
            state: Arc::new(Mutex::new(PipelineState::Idle)),
            shutdown_tx: None,
            handles: Vec::new(),
            errors: None,
        })
    }

    pub fn state(&self) -> PipelineState {
        self.state.lock().unwrap().clone()
    }

    pub fn metrics(&self) -> Arc<PipelineMetrics> {
        self.metrics.clone()
    }

    /// Rolling visualization state for one channel, shared with the
    /// retimer instances that feed it
    pub fn channel_state(&self, index: usize) -> Option<Arc<Mutex<ChannelState>>> {
        self.channel_states.get(index).cloned()
    }

    /// Receiver for pipeline errors (malformed batches, retimer faults,
    /// source disconnect). Available after `start()`; can be taken once.
    pub fn take_error_stream(&mut self) -> Option<mpsc::UnboundedReceiver<PipelineError>> {
        self.errors.take()
    }

    /// Subscribe to the source and spawn the dispatcher and sink forwarder
    pub async fn start(&mut self) -> Result<()> {
        let target = PipelineState::Running {
            started_at: Some(Instant::now()),
        };
        let current = self.state.lock().unwrap().clone();
        if !current.can_transition_to(&target) {
            return Err(anyhow!(
                "cannot start pipeline from state {}",
                current.name()
            ));
        }

        let batch_rx = self.source.subscribe().await?;
        let sink = self
            .sink
            .take()
            .ok_or_else(|| anyhow!("pipeline sink already consumed"))?;

        let (shutdown_tx, _) = broadcast::channel(16);
        let (err_tx, err_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::channel(self.config.channel_capacity);

        self.handles
            .push(self.spawn_dispatcher(batch_rx, out_tx, err_tx, shutdown_tx.clone()));
        self.handles.push(self.spawn_forwarder(out_rx, sink));

        self.shutdown_tx = Some(shutdown_tx);
        self.errors = Some(err_rx);
        *self.state.lock().unwrap() = target;

        debug!(
            channels = self.config.channels,
            sample_rate = self.config.sample_rate,
            tick_interval_us = self.config.tick_interval().as_micros() as u64,
            "pipeline started"
        );
        Ok(())
    }

    /// Tear the pipeline down: stop listening to the source, cancel every
    /// in-flight retimer, release the tick timers. Idempotent; calling it
    /// twice or before `start()` is a no-op.
    pub async fn stop(&mut self) -> Result<()> {
        let current = self.state.lock().unwrap().clone();
        if !current.is_running() && !matches!(current, PipelineState::Faulted { .. }) {
            return Ok(());
        }

        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        let handles = std::mem::take(&mut self.handles);
        for handle in handles {
            handle.await??;
        }

        let ran_for = match current {
            PipelineState::Running { started_at } => started_at.map(|t| t.elapsed()),
            _ => None,
        };
        *self.state.lock().unwrap() = PipelineState::Stopped { ran_for };

        debug!(
            samples_emitted = self.metrics.samples_emitted(),
            batches_received = self.metrics.batches_received(),
            "pipeline stopped"
        );
        Ok(())
    }

    fn spawn_dispatcher(
        &self,
        mut batch_rx: mpsc::Receiver<Batch>,
        out_tx: mpsc::Sender<RetimedSample>,
        err_tx: mpsc::UnboundedSender<PipelineError>,
        shutdown_tx: broadcast::Sender<()>,
    ) -> JoinHandle<Result<()>> {
        let demux = self.demux;
        let sample_rate = self.config.sample_rate;
        let tick_interval = self.config.tick_interval();
        let policy = self.config.generation_policy;
        let channel_states = self.channel_states.clone();
        let metrics = self.metrics.clone();
        let state = self.state.clone();
        let mut shutdown_rx = shutdown_tx.subscribe();

        tokio::spawn(async move {
            // One slot of outstanding retimer tasks per channel; under
            // Restart the previous generation is aborted before the next
            // one spawns.
            let mut generations: Vec<Vec<JoinHandle<()>>> =
                channel_states.iter().map(|_| Vec::new()).collect();

            loop {
                tokio::select! {
                    maybe_batch = batch_rx.recv() => match maybe_batch {
                        Some(batch) => {
                            metrics.record_batch();
                            let parts = match demux.split(batch) {
                                Ok(parts) => parts,
                                Err(e) => {
                                    warn!(error = %e, "dropping malformed batch");
                                    metrics.record_malformed_batch();
                                    let _ = err_tx.send(e);
                                    continue;
                                }
                            };

                            for part in parts {
                                let idx = part.channel.get();
                                match policy {
                                    GenerationPolicy::Restart => {
                                        for handle in generations[idx].drain(..) {
                                            handle.abort();
                                        }
                                    }
                                    GenerationPolicy::Overlap => {
                                        generations[idx].retain(|h| !h.is_finished());
                                    }
                                }

                                let handle = spawn_retimer(
                                    VirtualClockRetimer::new(
                                        part.channel,
                                        sample_rate,
                                        tick_interval,
                                        channel_states[idx].clone(),
                                    ),
                                    part.amplitudes,
                                    out_tx.clone(),
                                    shutdown_tx.subscribe(),
                                    err_tx.clone(),
                                    metrics.clone(),
                                );
                                generations[idx].push(handle);
                            }
                        }
                        None => {
                            // Source ended; in-flight retimers drain on
                            // their own clocks, nothing new is spawned.
                            debug!("sample source disconnected");
                            let faulted = PipelineState::Faulted {
                                error_msg: PipelineError::SourceDisconnected.to_string(),
                            };
                            {
                                let mut state = state.lock().unwrap();
                                if state.can_transition_to(&faulted) {
                                    *state = faulted;
                                }
                            }
                            let _ = err_tx.send(PipelineError::SourceDisconnected);
                            break;
                        }
                    },
                    _ = shutdown_rx.recv() => {
                        for handles in &mut generations {
                            for handle in handles.drain(..) {
                                handle.abort();
                            }
                        }
                        break;
                    }
                }
            }

            Ok(())
        })
    }

    fn spawn_forwarder(
        &self,
        mut out_rx: mpsc::Receiver<RetimedSample>,
        mut sink: Box<dyn SampleSink>,
    ) -> JoinHandle<Result<()>> {
        let metrics = self.metrics.clone();

        tokio::spawn(async move {
            while let Some(sample) = out_rx.recv().await {
                metrics.record_sample();
                sink.on_sample(sample.amplitude, sample.channel).await?;
            }
            Ok(())
        })
    }
}

fn spawn_retimer(
    retimer: VirtualClockRetimer,
    amplitudes: Vec<f64>,
    out_tx: mpsc::Sender<RetimedSample>,
    shutdown_rx: broadcast::Receiver<()>,
    err_tx: mpsc::UnboundedSender<PipelineError>,
    metrics: Arc<PipelineMetrics>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = retimer.run(amplitudes, out_tx, shutdown_rx).await {
            // A fault is isolated to this channel's instance; the rest of
            // the pipeline keeps running.
            warn!(error = %e, "retimer instance faulted");
            metrics.record_retimer_fault();
            let _ = err_tx.send(e);
        }
    })
}

/// Stop is signalled on drop as a last resort, but tasks cannot be awaited
/// here; call `stop()` for an orderly teardown.
impl Drop for PipelineOrchestrator {
    fn drop(&mut self) {
        if let Some(tx) = &self.shutdown_tx {
            let _ = tx.send(());
        }
    }
}
