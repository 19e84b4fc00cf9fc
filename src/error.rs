use thiserror::Error;

/// Failures the core can report. Everything else is an `anyhow` error at the
/// application layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub(crate) enum OrreryError {
    /// Bad command line input: unparseable coordinates, altitude or arity.
    #[error("argument error: {0}")]
    Argument(String),

    /// A broken invariant in the view setup, e.g. a zero-width visible range.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl OrreryError {
    pub(crate) fn argument(msg: impl Into<String>) -> Self {
        Self::Argument(msg.into())
    }

    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
