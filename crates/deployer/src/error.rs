use {
    alloy::{
        primitives::TxHash,
        providers::{PendingTransactionError, WatchTxError},
        transports::{RpcError, TransportError},
    },
    thiserror::Error,
};

/// Everything that can go wrong while deploying a single contract.
///
/// All variants are terminal: a deployment is attempted exactly once.
#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("unknown contract {0:?}: no artifact found")]
    UnknownContract(String),
    #[error("malformed artifact for {contract}: {reason}")]
    MalformedArtifact { contract: String, reason: String },
    #[error("network failure")]
    NetworkFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("transaction {} was rejected: {reason}", display_tx(.tx))]
    TransactionReverted { tx: Option<TxHash>, reason: String },
    #[error("invalid invocation of {contract}: {reason}")]
    InvalidInvocation { contract: String, reason: String },
}

fn display_tx(tx: &Option<TxHash>) -> String {
    tx.map(|tx| tx.to_string())
        .unwrap_or_else(|| "<unsent>".to_string())
}

impl DeploymentError {
    pub fn invalid_invocation(contract: &str, reason: impl ToString) -> Self {
        Self::InvalidInvocation {
            contract: contract.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed_artifact(contract: &str, reason: impl ToString) -> Self {
        Self::MalformedArtifact {
            contract: contract.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn network(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::NetworkFailure(Box::new(err))
    }

    /// Classifies an error returned while submitting a transaction.
    ///
    /// A JSON-RPC error response means the node looked at the transaction and
    /// refused it (revert during gas estimation, insufficient funds, bad
    /// nonce...). Anything else never reached a verdict.
    pub fn from_submission(err: TransportError) -> Self {
        match err {
            RpcError::ErrorResp(payload) => {
                tracing::debug!(?payload, "node rejected deployment transaction");
                Self::TransactionReverted {
                    tx: None,
                    reason: payload.message.to_string(),
                }
            }
            err => Self::network(err),
        }
    }

    /// Classifies an error returned while waiting for a submitted transaction
    /// to be confirmed.
    pub fn from_pending(tx: TxHash, err: PendingTransactionError) -> Self {
        match err {
            PendingTransactionError::TransportError(RpcError::ErrorResp(payload)) => {
                Self::TransactionReverted {
                    tx: Some(tx),
                    reason: payload.message.to_string(),
                }
            }
            PendingTransactionError::TxWatcher(WatchTxError::Timeout) => {
                tracing::warn!(?tx, "timed out waiting for confirmation");
                Self::network(err)
            }
            err => Self::network(err),
        }
    }
}
