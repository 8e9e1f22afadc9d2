use crate::errors::BallotError;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to read local store ({path}): {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("Local store is corrupted ({path}): {message}. Delete it to reset.")]
    Corrupted { path: String, message: String },

    #[error("Failed to write local store ({path}): {message}")]
    WriteFailed { path: String, message: String },

    #[error("Failed to encode stored value '{key}': {message}")]
    EncodeFailed { key: String, message: String },
}

impl BallotError for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            StorageError::ReadFailed { .. } => "STORAGE_READ_FAILED",
            StorageError::Corrupted { .. } => "STORAGE_CORRUPTED",
            StorageError::WriteFailed { .. } => "STORAGE_WRITE_FAILED",
            StorageError::EncodeFailed { .. } => "STORAGE_ENCODE_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, StorageError::Corrupted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupted_error_is_user_error() {
        let error = StorageError::Corrupted {
            path: "/tmp/store.json".to_string(),
            message: "expected value".to_string(),
        };
        assert_eq!(error.error_code(), "STORAGE_CORRUPTED");
        assert!(error.is_user_error());
        assert!(error.to_string().contains("Delete it to reset"));
    }
}
