//! The blockchain side of a deployment.

use {
    crate::error::DeploymentError,
    alloy::{
        network::{EthereumWallet, ReceiptResponse, TransactionBuilder},
        primitives::{Address, Bytes, TxHash},
        providers::{DynProvider, Provider, ProviderBuilder},
        rpc::types::TransactionRequest,
        signers::local::PrivateKeySigner,
    },
    std::time::Duration,
    url::Url,
};

/// What the chain reports back for a mined deployment transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub transaction_hash: TxHash,
    /// Address of the created contract. Only set when the transaction was a
    /// contract creation.
    pub contract_address: Option<Address>,
    pub success: bool,
    pub block_number: Option<u64>,
}

/// Abstracts the chain interactions a deployment needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Chain: Send + Sync {
    async fn chain_id(&self) -> Result<u64, DeploymentError>;

    /// Submits a contract creation transaction carrying `init_code` and
    /// waits until it is confirmed.
    async fn send_deployment(&self, init_code: Bytes) -> Result<Confirmation, DeploymentError>;
}

/// A JSON-RPC node reached over HTTP.
pub struct Node {
    provider: DynProvider,
    /// Set when transactions are signed locally.
    signer: Option<Address>,
    confirmations: u64,
    timeout: Duration,
}

impl Node {
    /// Without a signer, transactions are sent from the node's first
    /// unlocked account, which is how development nodes are used.
    pub fn new(
        url: Url,
        signer: Option<PrivateKeySigner>,
        confirmations: u64,
        timeout: Duration,
    ) -> Self {
        let (provider, signer) = match signer {
            Some(signer) => {
                let address = signer.address();
                let provider = ProviderBuilder::new()
                    .wallet(EthereumWallet::new(signer))
                    .connect_http(url)
                    .erased();
                (provider, Some(address))
            }
            None => (ProviderBuilder::new().connect_http(url).erased(), None),
        };
        Self {
            provider,
            signer,
            confirmations,
            timeout,
        }
    }

    async fn sender(&self) -> Result<Address, DeploymentError> {
        if let Some(address) = self.signer {
            return Ok(address);
        }
        let accounts = self
            .provider
            .get_accounts()
            .await
            .map_err(DeploymentError::network)?;
        accounts.first().copied().ok_or_else(|| {
            DeploymentError::NetworkFailure(
                "node has no unlocked accounts and no private key was configured".into(),
            )
        })
    }

    /// Bounds a request to the node by the configured timeout.
    async fn bounded<T>(
        &self,
        request: impl Future<Output = Result<T, DeploymentError>>,
    ) -> Result<T, DeploymentError> {
        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|elapsed| {
                tracing::warn!(timeout = ?self.timeout, "node did not answer in time");
                DeploymentError::network(elapsed)
            })?
    }

    async fn deploy(&self, init_code: Bytes) -> Result<Confirmation, DeploymentError> {
        let from = self.sender().await?;
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_deploy_code(init_code);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(DeploymentError::from_submission)?;
        let hash = *pending.tx_hash();
        tracing::debug!(?hash, ?from, "submitted deployment transaction");

        let receipt = pending
            .with_required_confirmations(self.confirmations)
            .with_timeout(Some(self.timeout))
            .get_receipt()
            .await
            .map_err(|err| DeploymentError::from_pending(hash, err))?;

        Ok(Confirmation {
            transaction_hash: receipt.transaction_hash,
            contract_address: receipt.contract_address,
            success: ReceiptResponse::status(&receipt),
            block_number: receipt.block_number,
        })
    }
}

#[async_trait::async_trait]
impl Chain for Node {
    async fn chain_id(&self) -> Result<u64, DeploymentError> {
        self.bounded(async {
            self.provider
                .get_chain_id()
                .await
                .map_err(DeploymentError::network)
        })
        .await
    }

    /// The whole deployment, from picking the sender to the last
    /// confirmation, has to finish within the configured timeout.
    async fn send_deployment(&self, init_code: Bytes) -> Result<Confirmation, DeploymentError> {
        self.bounded(self.deploy(init_code)).await
    }
}
