//! Domain-level error taxonomy for agreement analysis.

/// Agreement analysis errors.
#[derive(Debug, thiserror::Error)]
pub enum IaaError {
    /// The annotation matrix has no items, so no statistic is defined.
    #[error("empty input: annotation matrix contains zero items")]
    EmptyInput,

    #[error("record load failed ({source_name}): {message}")]
    UpstreamLoad {
        source_name: String,
        message: String,
    },

    #[error("cleaning step failed: {0}")]
    Clean(String),

    #[error("cannot parse answer {raw:?}: {reason}")]
    Parse { raw: String, reason: String },

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IaaError {
    /// Build an [`IaaError::UpstreamLoad`] from any displayable cause.
    pub fn upstream(source_name: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        IaaError::UpstreamLoad {
            source_name: source_name.into(),
            message: cause.to_string(),
        }
    }
}

/// Result type for agreement analysis operations.
pub type Result<T> = std::result::Result<T, IaaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_display() {
        let err = IaaError::EmptyInput;
        assert!(err.to_string().contains("zero items"));
        assert!(matches!(err, IaaError::EmptyInput));
    }

    #[test]
    fn test_upstream_load_carries_source() {
        let err = IaaError::upstream("data/experiment1/run3/batch1.jsonl", "line 4: EOF");
        let msg = err.to_string();
        assert!(msg.contains("batch1.jsonl"));
        assert!(msg.contains("line 4"));
        assert!(matches!(err, IaaError::UpstreamLoad { .. }));
    }

    #[test]
    fn test_parse_error_quotes_raw_answer() {
        let err = IaaError::Parse {
            raw: "  ".to_string(),
            reason: "answer is empty".to_string(),
        };
        assert!(err.to_string().contains("\"  \""));
    }
}
