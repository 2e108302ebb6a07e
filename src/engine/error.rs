use std::io;

#[derive(Debug)]
pub enum EngineError {
    /// Bad request input: unparsable window, off-grid minutes.
    Validation(String),
    /// The store could not be read or written.
    Io(io::Error),
    /// The persisted collection is not valid JSON for `[Appointment]`.
    Decode(serde_json::Error),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Validation(msg) => write!(f, "{msg}"),
            EngineError::Io(e) => write!(f, "store error: {e}"),
            EngineError::Decode(e) => write!(f, "error decoding appointments: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Validation(_) => None,
            EngineError::Io(e) => Some(e),
            EngineError::Decode(e) => Some(e),
        }
    }
}

impl From<io::Error> for EngineError {
    fn from(e: io::Error) -> Self {
        EngineError::Io(e)
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Decode(e)
    }
}
