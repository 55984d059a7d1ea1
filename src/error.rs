use thiserror::Error;

/// Errors surfaced by the retiming pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Inbound batch did not carry one array per configured channel
    #[error("malformed batch: expected {expected} channel arrays, got {actual}")]
    MalformedBatch { expected: usize, actual: usize },

    /// The underlying push source ended or dropped its side of the stream
    #[error("sample source disconnected")]
    SourceDisconnected,

    /// A single retimer instance hit an unrecoverable condition
    #[error("retimer fault on channel {channel}: {reason}")]
    RetimerFault { channel: usize, reason: String },

    /// Channel index outside the configured channel count
    #[error("channel index {index} out of range for {count} channels")]
    ChannelOutOfRange { index: usize, count: usize },

    /// Configuration rejected at construction time
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
