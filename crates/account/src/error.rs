use l2_primitives::ConfigurationError;
use thiserror::Error;

/// Smart account error
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SmartAccountError {
    /// Endpoints missing or still holding placeholder values (fix the configuration)
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Account derivation, client construction or the deployment check failed (reconnect to retry)
    #[error("{message}")]
    Initialization { message: String },
    /// Operation attempted before the session is ready
    #[error("Smart account not initialized")]
    NotInitialized,
    /// The bundler (or paymaster) rejected the user operation
    #[error("{message}")]
    Submission { message: String },
    /// Waiting for the user operation receipt failed or timed out
    #[error("{message}")]
    Receipt { message: String },
}

impl SmartAccountError {
    pub(crate) fn initialization(err: eyre::Report) -> Self {
        Self::Initialization { message: err.to_string() }
    }

    pub(crate) fn submission(err: eyre::Report) -> Self {
        Self::Submission { message: err.to_string() }
    }

    pub(crate) fn receipt(err: eyre::Report) -> Self {
        Self::Receipt { message: err.to_string() }
    }
}
