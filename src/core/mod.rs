pub mod batch;
pub mod config;
pub mod traits;

pub use batch::{Batch, ChannelIndex, RetimedSample};
pub use config::{GenerationPolicy, StreamConfig};
pub use traits::{SampleSink, SampleSource};
