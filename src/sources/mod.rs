pub mod event_hub;
pub mod sine;

pub use event_hub::{EventHub, EventSource};
pub use sine::SineBatchSource;
