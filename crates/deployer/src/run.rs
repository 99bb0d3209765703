use {
    crate::{
        arguments::Arguments,
        artifact::Artifacts,
        chain::{Chain, Node},
        deployer::{Deployer, DeploymentResult},
        manifest::Manifest,
        plan::Plan,
    },
    anyhow::{Result, ensure},
    std::{path::Path, process::ExitCode, sync::Arc},
};

/// Runs the deployment described by `args` and maps the outcome to the
/// process exit code. Errors are logged with their full chain of causes.
pub async fn main(args: Arguments) -> ExitCode {
    match run(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:?}");
            ExitCode::FAILURE
        }
    }
}

pub async fn run(args: Arguments) -> Result<Vec<DeploymentResult>> {
    let plan = match &args.plan {
        Some(path) => Plan::from_path(path).await?,
        None => Plan::from_contracts(&args.contracts),
    }
    .validate()?;

    let chain = Arc::new(Node::new(
        args.node_url,
        args.private_key,
        args.confirmations,
        args.confirmation_timeout,
    ));
    let deployer = Deployer::new(Artifacts::new(args.artifacts), chain.clone());
    deploy(
        &deployer,
        chain.as_ref(),
        &plan,
        args.chain_id,
        args.manifest.as_deref(),
    )
    .await
}

async fn deploy(
    deployer: &Deployer,
    chain: &dyn Chain,
    plan: &Plan,
    expected_chain_id: Option<u64>,
    manifest: Option<&Path>,
) -> Result<Vec<DeploymentResult>> {
    deployer.preflight(plan)?;

    let chain_id = chain.chain_id().await?;
    if let Some(expected) = expected_chain_id {
        ensure!(
            chain_id == expected,
            "node is on chain {chain_id} but chain {expected} was requested"
        );
    }
    tracing::info!(chain_id, steps = plan.steps.len(), "connected to network");

    let results = deployer.execute(plan).await?;

    if let Some(path) = manifest {
        Manifest {
            chain_id,
            deployments: &results,
        }
        .write(path)
        .await?;
        tracing::info!(?path, "wrote deployment manifest");
    }

    tracing::info!("Deployment completed successfully!");
    Ok(results)
}
