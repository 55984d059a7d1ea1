pub mod core;
pub mod engine;
pub mod error;
pub mod observability;
pub mod sinks;
pub mod sources;
pub mod visualization;
