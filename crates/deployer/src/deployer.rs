use {
    crate::{
        artifact::Artifacts,
        chain::{Chain, Confirmation},
        error::DeploymentError,
        plan::Plan,
    },
    alloy::primitives::{Address, TxHash},
    serde::Serialize,
    std::{collections::HashMap, sync::Arc},
};

/// Outcome of a confirmed deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResult {
    pub contract: String,
    pub address: Address,
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub confirmed: bool,
}

impl DeploymentResult {
    /// Only a successful contract creation with a real address counts as a
    /// deployment.
    pub fn from_confirmation(
        contract: &str,
        confirmation: Confirmation,
    ) -> Result<Self, DeploymentError> {
        if !confirmation.success {
            return Err(DeploymentError::TransactionReverted {
                tx: Some(confirmation.transaction_hash),
                reason: "execution reverted".to_string(),
            });
        }
        let address = match confirmation.contract_address {
            Some(address) if !address.is_zero() => address,
            _ => {
                return Err(DeploymentError::invalid_invocation(
                    contract,
                    format!(
                        "transaction {} did not create a contract",
                        confirmation.transaction_hash
                    ),
                ));
            }
        };
        Ok(Self {
            contract: contract.to_string(),
            address,
            transaction_hash: confirmation.transaction_hash,
            block_number: confirmation.block_number,
            confirmed: true,
        })
    }
}

pub struct Deployer {
    artifacts: Artifacts,
    chain: Arc<dyn Chain>,
}

impl Deployer {
    pub fn new(artifacts: Artifacts, chain: Arc<dyn Chain>) -> Self {
        Self { artifacts, chain }
    }

    pub async fn deploy(&self, contract: &str) -> Result<DeploymentResult, DeploymentError> {
        self.deploy_with_args(contract, &[]).await
    }

    pub async fn deploy_with_args(
        &self,
        contract: &str,
        args: &[String],
    ) -> Result<DeploymentResult, DeploymentError> {
        let artifact = self.artifacts.resolve(contract)?;
        let init_code = artifact.init_code(args)?;

        tracing::info!("Deploying {contract}...");
        let confirmation = self.chain.send_deployment(init_code).await?;
        let result = DeploymentResult::from_confirmation(contract, confirmation)?;
        tracing::info!(
            tx = %result.transaction_hash,
            block = ?result.block_number,
            "{contract} deployed at: {}",
            result.address
        );
        Ok(result)
    }

    /// Checks every step of a plan without sending anything: artifacts are
    /// resolved and constructor arguments encoded, with the zero address
    /// standing in for contracts earlier steps are going to deploy.
    pub fn preflight(&self, plan: &Plan) -> Result<(), DeploymentError> {
        let mut placeholders = HashMap::new();
        for step in &plan.steps {
            let artifact = self.artifacts.resolve(&step.contract)?;
            artifact.init_code(&step.resolve_args(&placeholders)?)?;
            placeholders.insert(step.label().to_string(), Address::ZERO);
        }
        Ok(())
    }

    /// Deploys the steps of a plan in order. The first failure aborts the
    /// remaining steps.
    pub async fn execute(&self, plan: &Plan) -> Result<Vec<DeploymentResult>, DeploymentError> {
        let mut deployed = HashMap::new();
        let mut results = Vec::with_capacity(plan.steps.len());
        for (i, step) in plan.steps.iter().enumerate() {
            let label = step.label();
            let args = step.resolve_args(&deployed)?;
            match self.deploy_with_args(&step.contract, &args).await {
                Ok(result) => {
                    deployed.insert(label.to_string(), result.address);
                    results.push(result);
                }
                Err(err) => {
                    tracing::warn!(
                        step = i,
                        %label,
                        completed = results.len(),
                        "aborting deployment plan"
                    );
                    return Err(err);
                }
            }
        }
        Ok(results)
    }
}
