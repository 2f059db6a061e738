//! Draft storage error types.

/// Errors that can occur when reading or writing the local store.
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    /// Reading or writing the store file failed
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored text is not valid JSON of the expected shape
    #[error("corrupt stored data in {location}: {message}")]
    Corrupt { location: String, message: String },

    /// The draft's `stops` entry exists but is not a list
    #[error("draft field `stops` is not a list")]
    StopsNotList,
}
