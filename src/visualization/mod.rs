pub mod rolling;

pub use rolling::{ChannelState, RollingBuffer};
