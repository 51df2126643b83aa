use std::path::PathBuf;

use crate::domain::Stage;

/// Process-level error: a message plus the exit code the binary should return.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

/// Why a stage ended without producing its artifact.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("{stage} input '{}' not found; run the previous stage first", .path.display())]
    MissingInput { stage: Stage, path: PathBuf },

    #[error("input '{}' is not usable: {reason}", .path.display())]
    InvalidInput { path: PathBuf, reason: String },

    #[error("{stage} produced no data")]
    NoData { stage: Stage },

    #[error("i/o error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("warehouse load failed: {reason}")]
    Load { reason: String },

    #[error("configuration error: {reason}")]
    Config { reason: String },
}

impl StageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            StageError::Io { .. } | StageError::Config { .. } => 2,
            StageError::MissingInput { .. } | StageError::InvalidInput { .. } | StageError::NoData { .. } => 3,
            StageError::Load { .. } => 4,
        }
    }
}

impl From<StageError> for AppError {
    fn from(err: StageError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl From<rusqlite::Error> for StageError {
    fn from(err: rusqlite::Error) -> Self {
        StageError::Load {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_error_keeps_exit_code_when_converted() {
        let err = StageError::MissingInput {
            stage: Stage::Gold,
            path: PathBuf::from("silver/refined_cards.csv"),
        };
        let app: AppError = err.into();
        assert_eq!(app.exit_code(), 3);
        assert!(app.to_string().contains("gold input 'silver/refined_cards.csv' not found"));
        assert_eq!(
            format!("{app:?}"),
            format!("AppError {{ exit_code: 3, message: {:?} }}", app.to_string())
        );
    }
}
