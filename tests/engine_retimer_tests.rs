use eegstream::core::{ChannelIndex, RetimedSample};
use eegstream::engine::VirtualClockRetimer;
use eegstream::error::PipelineError;
use eegstream::visualization::ChannelState;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

fn make_retimer(
    sample_rate: usize,
    tick_interval: Duration,
) -> (VirtualClockRetimer, Arc<Mutex<ChannelState>>) {
    let state = Arc::new(Mutex::new(ChannelState::new(Duration::from_secs(10))));
    let channel = ChannelIndex::new(0, 1).unwrap();
    (
        VirtualClockRetimer::new(channel, sample_rate, tick_interval, state.clone()),
        state,
    )
}

async fn collect(mut rx: mpsc::Receiver<RetimedSample>) -> Vec<RetimedSample> {
    let mut samples = Vec::new();
    while let Some(sample) = rx.recv().await {
        samples.push(sample);
    }
    samples
}

#[tokio::test(start_paused = true)]
async fn test_emissions_spaced_by_tick_interval() {
    let (retimer, state) = make_retimer(4, Duration::from_millis(250));
    let (tx, rx) = mpsc::channel(8);
    let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

    let handle = tokio::spawn(retimer.run(vec![1.0, 2.0, 3.0, 4.0], tx, shutdown_rx));
    let samples = collect(rx).await;
    handle.await.unwrap().unwrap();

    let amplitudes: Vec<f64> = samples.iter().map(|s| s.amplitude).collect();
    assert_eq!(amplitudes, vec![1.0, 2.0, 3.0, 4.0]);

    // Paused clock: spacing is exactly one tick
    for pair in samples.windows(2) {
        assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::from_millis(250));
    }

    let state = state.lock().unwrap();
    assert_eq!(state.buffer().len(), 4);
    assert_eq!(state.last_value(), Some(4.0));
}

#[tokio::test(start_paused = true)]
async fn test_excess_amplitudes_dropped() {
    let (retimer, _state) = make_retimer(3, Duration::from_millis(10));
    let (tx, rx) = mpsc::channel(8);
    let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

    let handle = tokio::spawn(retimer.run(vec![1.0, 2.0, 3.0, 4.0, 5.0], tx, shutdown_rx));
    let samples = collect(rx).await;
    handle.await.unwrap().unwrap();

    assert_eq!(samples.len(), 3);
    assert_eq!(samples[2].amplitude, 3.0);
}

#[tokio::test(start_paused = true)]
async fn test_short_sequence_ends_early_without_error() {
    // 3 amplitudes against a 250-sample budget
    let (retimer, state) = make_retimer(250, Duration::from_millis(4));
    let (tx, rx) = mpsc::channel(8);
    let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

    let handle = tokio::spawn(retimer.run(vec![7.0, 8.0, 9.0], tx, shutdown_rx));
    let samples = collect(rx).await;
    let result = handle.await.unwrap();

    assert!(result.is_ok());
    assert_eq!(samples.len(), 3);
    assert_eq!(state.lock().unwrap().last_value(), Some(9.0));
}

#[tokio::test(start_paused = true)]
async fn test_non_finite_amplitude_faults_instance() {
    let (retimer, state) = make_retimer(4, Duration::from_millis(10));
    let (tx, rx) = mpsc::channel(8);
    let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

    let handle = tokio::spawn(retimer.run(vec![1.0, f64::NAN, 3.0], tx, shutdown_rx));
    let samples = collect(rx).await;
    let result = handle.await.unwrap();

    assert_eq!(samples.len(), 1);
    match result.unwrap_err() {
        PipelineError::RetimerFault { channel, reason } => {
            assert_eq!(channel, 0);
            assert!(reason.contains("non-finite"));
        }
        other => panic!("unexpected error: {other}"),
    }
    // The fault never reached the rolling buffer
    assert_eq!(state.lock().unwrap().buffer().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_remaining_ticks() {
    let (retimer, _state) = make_retimer(100, Duration::from_millis(50));
    let (tx, mut rx) = mpsc::channel(8);
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    let amplitudes: Vec<f64> = (0..100).map(|k| k as f64).collect();
    let handle = tokio::spawn(retimer.run(amplitudes, tx, shutdown_rx));

    // Take one emission, then pull the plug
    let first = rx.recv().await.unwrap();
    assert_eq!(first.amplitude, 0.0);
    shutdown_tx.send(()).unwrap();

    let mut rest = 0;
    while rx.recv().await.is_some() {
        rest += 1;
    }
    handle.await.unwrap().unwrap();

    // At most one more emission could have raced the signal
    assert!(rest <= 1, "expected immediate cancellation, got {rest} more");
}
