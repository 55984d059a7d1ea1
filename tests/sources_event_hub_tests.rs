use eegstream::core::{Batch, SampleSource};
use eegstream::sources::{EventHub, EventSource};

#[tokio::test]
async fn test_publish_reaches_subscriber() {
    let hub = EventHub::new(4);
    let mut rx = hub.subscribe("metric:eeg");

    hub.publish("metric:eeg", Batch::new(vec![vec![1.0, 2.0]]))
        .await;

    let batch = rx.recv().await.unwrap();
    assert_eq!(batch.channel_count(), 1);
}

#[tokio::test]
async fn test_events_are_independent() {
    let hub = EventHub::new(4);
    let mut eeg_rx = hub.subscribe("metric:eeg");
    let mut other_rx = hub.subscribe("metric:accel");

    hub.publish("metric:eeg", Batch::new(vec![vec![1.0]])).await;

    assert!(eeg_rx.try_recv().is_ok());
    assert!(other_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_every_listener_gets_a_copy() {
    let hub = EventHub::new(4);
    let mut a = hub.subscribe("metric:eeg");
    let mut b = hub.subscribe("metric:eeg");

    hub.publish("metric:eeg", Batch::new(vec![vec![7.0]])).await;

    assert_eq!(a.recv().await.unwrap().into_channels(), vec![vec![7.0]]);
    assert_eq!(b.recv().await.unwrap().into_channels(), vec![vec![7.0]]);
}

#[tokio::test]
async fn test_dropped_receiver_is_unregistered() {
    let hub = EventHub::new(4);
    let rx = hub.subscribe("metric:eeg");
    assert_eq!(hub.listener_count("metric:eeg"), 1);

    drop(rx);
    assert_eq!(hub.listener_count("metric:eeg"), 0);

    // Publishing into the void is fine
    hub.publish("metric:eeg", Batch::new(vec![vec![1.0]])).await;
    hub.publish("metric:unknown", Batch::new(vec![vec![1.0]]))
        .await;
}

#[tokio::test]
async fn test_event_source_binds_one_event() {
    let hub = EventHub::default();
    let mut source = EventSource::new(&hub, "metric:eeg");
    let mut rx = source.subscribe().await.unwrap();

    hub.publish("metric:accel", Batch::new(vec![vec![0.0]]))
        .await;
    hub.publish("metric:eeg", Batch::new(vec![vec![42.0]]))
        .await;

    let batch = rx.recv().await.unwrap();
    assert_eq!(batch.into_channels(), vec![vec![42.0]]);
}
