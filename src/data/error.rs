use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the data layer.
#[derive(Debug, Error)]
pub enum DataError {
    /// The dataset could not be read: missing file, unreadable content,
    /// unsupported format or a required column absent.
    #[error("dataset unavailable ({}): {reason}", .path.display())]
    DataUnavailable { path: PathBuf, reason: String },

    /// Year bounds are inverted.
    #[error("invalid selection: year_min {year_min} is greater than year_max {year_max}")]
    InvalidSelection { year_min: i32, year_max: i32 },
}
