use thiserror::Error;

/// Failures surfaced by the leveling engine.
///
/// Argument problems are reported before any store access. Store write
/// failures never show up here: they are logged and swallowed.
#[derive(Debug, Error)]
pub enum LevelingError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("out of range: {0}")]
    OutOfRange(&'static str),
    #[error("store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl LevelingError {
    /// True for the two synchronous argument-validation kinds.
    pub fn is_argument_error(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::OutOfRange(_))
    }
}

pub(crate) fn require_id(value: u64, what: &'static str) -> Result<u64, LevelingError> {
    if value == 0 {
        return Err(LevelingError::InvalidArgument(what));
    }

    Ok(value)
}
