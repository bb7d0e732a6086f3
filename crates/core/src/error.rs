/// Result alias that carries the custom [`WavescopeError`] type.
pub type Result<T> = std::result::Result<T, WavescopeError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum WavescopeError {
    /// The analyzer only supports radix-2 transform lengths.
    #[error("invalid FFT size {0}: must be a power of two")]
    InvalidFftSize(usize),
    /// No usable audio input device was found on the host.
    #[error("no audio input device available")]
    NoInputDevice,
    /// The input device did not expose a default stream configuration.
    #[error("failed to query stream configuration: {0}")]
    StreamConfig(#[from] cpal::DefaultStreamConfigError),
    /// The audio backend refused to build the capture stream.
    #[error("failed to build capture stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    /// The capture stream could not be started.
    #[error("failed to start capture stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
    /// Settings files that exist but do not parse as JSON.
    #[error("malformed settings: {0}")]
    Settings(#[from] serde_json::Error),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Errors that only need to surface a readable message, such as poisoned
    /// locks or degenerate canvas sizes.
    #[error("{0}")]
    Message(String),
}

impl WavescopeError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for WavescopeError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for WavescopeError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
