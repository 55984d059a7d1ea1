use eegstream::core::StreamConfig;
use eegstream::engine::PipelineOrchestrator;
use eegstream::sinks::PrintSink;
use eegstream::sources::SineBatchSource;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("eegstream - retiming pipeline demo");
    println!("==================================\n");

    // Small configuration so the console output stays readable; the
    // hardware defaults are 8 channels at 250 Hz.
    let config = StreamConfig::from_json(serde_json::json!({
        "channels": 4,
        "sample_rate": 25,
        "buffer_time_ms": 1000
    }))?;
    println!(
        "channels={} sample_rate={} tick_interval={:?}\n",
        config.channels,
        config.sample_rate,
        config.tick_interval()
    );

    let source = SineBatchSource::new(&config).with_frequency(4.0);
    let sink = PrintSink::new("eeg");

    let mut pipeline = PipelineOrchestrator::new(config.clone(), Box::new(source), Box::new(sink))?;
    pipeline.start().await?;

    // Let a couple of batches flow through the virtual clock
    tokio::time::sleep(Duration::from_millis(2500)).await;
    pipeline.stop().await?;

    println!("\nper-channel state after teardown:");
    for index in 0..config.channels {
        if let Some(state) = pipeline.channel_state(index) {
            let state = state.lock().unwrap();
            println!(
                "  channel {}: last={} buffered_points={}",
                index,
                state.last_value_formatted().unwrap_or_else(|| "-".to_string()),
                state.buffer().len()
            );
        }
    }

    let metrics = pipeline.metrics();
    println!(
        "\nbatches={} samples={} malformed={} faults={}",
        metrics.batches_received(),
        metrics.samples_emitted(),
        metrics.malformed_batches(),
        metrics.retimer_faults()
    );

    Ok(())
}
