use crate::error::Error;

/// Result type alias used throughout rowscan.
pub type Result<T> = std::result::Result<T, Error>;
