use coinquote_core::{Diagnostic, LookupError, Rejected};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Rejected(#[from] Rejected),

    #[error(transparent)]
    Unresolved(#[from] Diagnostic),

    #[error("{failed} of {total} symbols could not be resolved")]
    PartialBatch { failed: usize, total: usize },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Server(#[from] coinquote_web::WebError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<LookupError> for CliError {
    fn from(error: LookupError) -> Self {
        match error {
            LookupError::Rejected(rejected) => Self::Rejected(rejected),
            LookupError::Unresolved(diagnostic) => Self::Unresolved(diagnostic),
        }
    }
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Rejected(_) => 2,
            Self::Unresolved(_) => 3,
            Self::PartialBatch { .. } => 3,
            Self::Serialization(_) => 4,
            Self::Server(_) => 6,
            Self::Io(_) => 10,
        }
    }
}
