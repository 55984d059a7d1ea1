pub mod print;
pub mod render_feed;

pub use print::PrintSink;
pub use render_feed::{RenderFeedSink, RenderSample};
