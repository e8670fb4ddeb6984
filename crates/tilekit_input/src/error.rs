//! Input error types

use std::fmt;

/// Error raised while saving or loading input recordings
#[derive(Debug)]
pub enum InputError {
    /// File system error
    Io(std::io::Error),
    /// Malformed recording
    Json(serde_json::Error),
    /// `export_record` called before any recording started
    NotRecording,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Io(e) => write!(f, "IO error: {}", e),
            InputError::Json(e) => write!(f, "Recording format error: {}", e),
            InputError::NotRecording => write!(f, "No input recording in progress"),
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::Io(e) => Some(e),
            InputError::Json(e) => Some(e),
            InputError::NotRecording => None,
        }
    }
}

impl From<std::io::Error> for InputError {
    fn from(e: std::io::Error) -> Self {
        InputError::Io(e)
    }
}

impl From<serde_json::Error> for InputError {
    fn from(e: serde_json::Error) -> Self {
        InputError::Json(e)
    }
}
