use crate::core::{Batch, SampleSource, StreamConfig};
use anyhow::Result;
use async_trait::async_trait;
use std::f64::consts::PI;
use std::time::Duration;
use tokio::sync::mpsc;

/// Synthetic batch generator for demos and tests: one full batch of
/// multi-channel sine amplitudes every buffer period, with continuous phase
/// across batches and a fixed phase offset per channel.
pub struct SineBatchSource {
    channels: usize,
    samples_per_batch: usize,
    batch_interval: Duration,
    frequency: f64,
    amplitude: f64,
}

impl SineBatchSource {
    pub fn new(config: &StreamConfig) -> Self {
        Self {
            channels: config.channels,
            samples_per_batch: config.sample_rate,
            batch_interval: Duration::from_millis(config.buffer_time_ms),
            frequency: 10.0,
            amplitude: 50.0,
        }
    }

    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }
}

#[async_trait]
impl SampleSource for SineBatchSource {
    async fn subscribe(&mut self) -> Result<mpsc::Receiver<Batch>> {
        let (tx, rx) = mpsc::channel(4);

        let channels = self.channels;
        let samples_per_batch = self.samples_per_batch;
        let batch_interval = self.batch_interval;
        let frequency = self.frequency;
        let amplitude = self.amplitude;

        tokio::spawn(async move {
            let dt = batch_interval.as_secs_f64() / samples_per_batch as f64;
            let mut t = 0.0f64;
            let mut ticker = tokio::time::interval(batch_interval);

            loop {
                ticker.tick().await;

                let arrays: Vec<Vec<f64>> = (0..channels)
                    .map(|channel| {
                        let offset = channel as f64 * PI / 8.0;
                        (0..samples_per_batch)
                            .map(|k| {
                                let phase = 2.0 * PI * frequency * (t + k as f64 * dt);
                                amplitude * (phase + offset).sin()
                            })
                            .collect()
                    })
                    .collect();
                t += batch_interval.as_secs_f64();

                if tx.send(Batch::new(arrays)).await.is_err() {
                    // Subscriber dropped, stop generating
                    break;
                }
            }
        });

        Ok(rx)
    }
}
