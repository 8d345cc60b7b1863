//! Domain error types.

/// Top-level error type for renewcast.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// A required field is missing or has the wrong shape.
    #[error("schema error: {reason}")]
    Schema { reason: String },

    /// A mathematically invalid parameter combination.
    #[error("domain error: {reason}")]
    Domain { reason: String },

    /// An external source could not be read.
    #[error("resource error: {reason}")]
    Resource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    pub fn schema(reason: impl Into<String>) -> Self {
        AnalysisError::Schema {
            reason: reason.into(),
        }
    }

    pub fn domain(reason: impl Into<String>) -> Self {
        AnalysisError::Domain {
            reason: reason.into(),
        }
    }

    pub fn resource(reason: impl Into<String>) -> Self {
        AnalysisError::Resource {
            reason: reason.into(),
        }
    }

    /// Errors that a fail-soft boundary (sensitivity sweep, report
    /// aggregation) may absorb. Anything else must propagate.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AnalysisError::Schema { .. } | AnalysisError::Domain { .. })
    }
}

impl From<&AnalysisError> for std::process::ExitCode {
    fn from(err: &AnalysisError) -> Self {
        let code: u8 = match err {
            AnalysisError::Io(_) | AnalysisError::Resource { .. } => 1,
            AnalysisError::ConfigParse { .. }
            | AnalysisError::ConfigMissing { .. }
            | AnalysisError::ConfigInvalid { .. } => 2,
            AnalysisError::Schema { .. } => 3,
            AnalysisError::Domain { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
