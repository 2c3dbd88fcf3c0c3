//! # Errors
//!
//! Error type returned by a reconciliation pass.
//!
//! Every variant is terminal for the current pass. Nothing here is retried
//! locally; the controller's error policy requeues the whole object.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcilerError {
    /// A declared source file does not exist under the secrets root
    #[error("Secret {path} was not found")]
    SourceNotFound { path: String },

    /// A declared source file exists but could not be read as text
    #[error("Secret {path} could not be read: {source}")]
    SourceUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The live Secret is unmanaged or managed by another instance
    #[error("Secret {name} is managed by '{current_owner}' not '{expected_owner}'")]
    OwnershipConflict {
        name: String,
        current_owner: String,
        expected_owner: String,
    },

    /// The declaration payload could not be decoded structurally
    #[error("Invalid SecretsDistribution payload: {0}")]
    InvalidDeclaration(#[from] serde_json::Error),

    /// Encoded secret data could not be turned back into bytes
    #[error("Secret data is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// The Kubernetes API call failed
    #[error("Secret API call failed: {0}")]
    Store(#[from] anyhow::Error),
}

impl ReconcilerError {
    /// Short machine-friendly label, used for metrics and structured logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ReconcilerError::SourceNotFound { .. } => "source-not-found",
            ReconcilerError::SourceUnreadable { .. } => "source-unreadable",
            ReconcilerError::OwnershipConflict { .. } => "ownership-conflict",
            ReconcilerError::InvalidDeclaration(_) => "invalid-declaration",
            ReconcilerError::Encoding(_) => "encoding",
            ReconcilerError::Store(_) => "store",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ownership_conflict_message_names_both_owners() {
        let err = ReconcilerError::OwnershipConflict {
            name: "db-credentials".to_string(),
            current_owner: String::new(),
            expected_owner: "secrets-distributor".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Secret db-credentials is managed by '' not 'secrets-distributor'"
        );
        assert_eq!(err.kind(), "ownership-conflict");
    }

    #[test]
    fn test_store_error_wraps_anyhow() {
        let err: ReconcilerError = anyhow::anyhow!("connection refused").into();
        assert!(matches!(err, ReconcilerError::Store(_)));
        assert_eq!(err.to_string(), "Secret API call failed: connection refused");
    }
}
