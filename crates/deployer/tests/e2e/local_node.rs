//! Tests against a local development node. They need `anvil` on the `PATH`.

use {
    crate::{DEV_KEY, arguments, artifacts, fixtures, is_address},
    alloy::{
        node_bindings::{Anvil, AnvilInstance},
        primitives::{Address, Bytes, address},
        providers::{Provider, ProviderBuilder},
    },
    deployer::{Artifacts, Deployer, DeploymentError, Node},
    std::{process::ExitCode, sync::Arc, time::Duration},
};

const WETH: Address = address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

fn spawn() -> AnvilInstance {
    observe::tracing::initialize_reentrant(&observe::Config::default());
    Anvil::new().try_spawn().expect("failed to spawn anvil")
}

fn deployer(anvil: &AnvilInstance, signer: Option<&str>) -> Deployer {
    let node = Node::new(
        anvil.endpoint_url(),
        signer.map(|key| key.parse().unwrap()),
        1,
        Duration::from_secs(30),
    );
    Deployer::new(Artifacts::new(artifacts()), Arc::new(node))
}

async fn code_at(anvil: &AnvilInstance, address: Address) -> Bytes {
    ProviderBuilder::new()
        .connect_http(anvil.endpoint_url())
        .get_code_at(address)
        .await
        .unwrap()
}

#[tokio::test]
#[ignore]
async fn local_node_deploys_factory() {
    let anvil = spawn();

    let result = deployer(&anvil, None)
        .deploy("UniswapV3Factory")
        .await
        .unwrap();

    assert!(result.confirmed);
    assert!(is_address(&result.address.to_string()));
    assert_eq!(
        code_at(&anvil, result.address).await,
        Bytes::from_static(&[0x60, 0x2a, 0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xf3])
    );
}

#[tokio::test]
#[ignore]
async fn local_node_deploys_with_private_key() {
    let anvil = spawn();

    let result = deployer(&anvil, Some(DEV_KEY))
        .deploy("UniswapV3Factory")
        .await
        .unwrap();

    // First transaction of the first development account.
    assert_eq!(
        result.address,
        address!("0x5FbDB2315678afecb367f032d93F642f64180aa3")
    );
}

#[tokio::test]
#[ignore]
async fn local_node_deployments_are_not_idempotent() {
    let anvil = spawn();
    let deployer = deployer(&anvil, None);

    let first = deployer.deploy("UniswapV3Factory").await.unwrap();
    let second = deployer.deploy("UniswapV3Factory").await.unwrap();

    assert_ne!(first.address, second.address);
    assert_ne!(first.transaction_hash, second.transaction_hash);
}

#[tokio::test]
#[ignore]
async fn local_node_reverting_constructor() {
    let anvil = spawn();

    let err = deployer(&anvil, None).deploy("Reverter").await.unwrap_err();
    assert!(
        matches!(err, DeploymentError::TransactionReverted { .. }),
        "{err:?}"
    );
}

#[tokio::test]
#[ignore]
async fn local_node_numeric_literal_constructor_argument() {
    let anvil = spawn();

    let err = deployer(&anvil, None)
        .deploy_with_args(
            "SwapRouter",
            &["1234567890".to_string(), WETH.to_string()],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DeploymentError::InvalidInvocation { .. }));
}

#[tokio::test]
#[ignore]
async fn local_node_plan_with_manifest() {
    let anvil = spawn();
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("deployments.json");
    let plan = fixtures().join("plans/periphery.toml");

    let results = deployer::run(arguments(
        &anvil.endpoint(),
        &[
            "--plan",
            plan.to_str().unwrap(),
            "--manifest",
            manifest.to_str().unwrap(),
            "--private-key",
            DEV_KEY,
            "--chain-id",
            "31337",
        ],
    ))
    .await
    .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].contract, "UniswapV3Factory");
    assert_eq!(results[1].contract, "SwapRouter");

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&manifest).unwrap()).unwrap();
    assert_eq!(written["chainId"], 31337);
    assert_eq!(written["deployments"].as_array().unwrap().len(), 2);
}

#[tokio::test]
#[ignore]
async fn local_node_default_invocation_exits_successfully() {
    let anvil = spawn();

    assert_eq!(
        deployer::main(arguments(&anvil.endpoint(), &[])).await,
        ExitCode::SUCCESS
    );
}

#[tokio::test]
#[ignore]
async fn local_node_wrong_chain_id() {
    let anvil = spawn();
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("deployments.json");

    let result = deployer::run(arguments(
        &anvil.endpoint(),
        &[
            "--chain-id",
            "1",
            "--manifest",
            manifest.to_str().unwrap(),
        ],
    ))
    .await;

    assert!(result.is_err());
    assert!(!manifest.exists());
}
