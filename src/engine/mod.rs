pub mod demux;
pub mod orchestrator;
pub mod retimer;
pub mod state;

pub use demux::{ChannelDemultiplexer, ChannelSamples};
pub use orchestrator::PipelineOrchestrator;
pub use retimer::VirtualClockRetimer;
pub use state::PipelineState;
