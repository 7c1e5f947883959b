use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Malformed replay data: {0}")]
    Format(String),

    #[error("Incomplete replay data: {0}")]
    IncompleteData(String),

    #[error("Inconsistent replay: detected {detected} misses, replay reports {recorded}")]
    InconsistentReplay { detected: usize, recorded: u16 },

    #[error("Compression codec error: {0}")]
    Compression(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Incomplete data can be fixed by loading the full replay and retrying.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::IncompleteData(_))
    }

    pub(crate) fn format(message: impl Into<String>) -> Self {
        Error::Format(message.into())
    }

    pub(crate) fn incomplete(message: impl Into<String>) -> Self {
        Error::IncompleteData(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        assert!(err.is_not_found());

        let other_io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err2 = Error::Io(other_io_err);
        assert!(!err2.is_not_found());
    }

    #[test]
    fn test_only_incomplete_data_is_recoverable() {
        assert!(Error::incomplete("header only").is_recoverable());
        assert!(!Error::format("bad game mode").is_recoverable());
        assert!(
            !Error::InconsistentReplay {
                detected: 3,
                recorded: 1
            }
            .is_recoverable()
        );
    }

    #[test]
    fn test_inconsistent_replay_message() {
        let err = Error::InconsistentReplay {
            detected: 4,
            recorded: 2,
        };
        assert_eq!(
            err.to_string(),
            "Inconsistent replay: detected 4 misses, replay reports 2"
        );
    }
}
