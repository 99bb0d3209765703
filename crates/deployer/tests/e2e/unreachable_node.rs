use {
    crate::{DEV_KEY, arguments, artifacts},
    alloy::primitives::Bytes,
    deployer::{Artifacts, Chain, Deployer, DeploymentError, Node},
    std::{process::ExitCode, sync::Arc, time::Duration},
    tokio::net::TcpListener,
};

// Nothing listens on the discard port, so connections are refused right away.
const UNREACHABLE: &str = "http://127.0.0.1:9";

fn node(signer: Option<&str>) -> Node {
    Node::new(
        UNREACHABLE.parse().unwrap(),
        signer.map(|key| key.parse().unwrap()),
        1,
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn unreachable_node_is_a_network_failure() {
    observe::tracing::initialize_reentrant(&observe::Config::default());
    for signer in [None, Some(DEV_KEY)] {
        let deployer = Deployer::new(Artifacts::new(artifacts()), Arc::new(node(signer)));
        let err = deployer.deploy("UniswapV3Factory").await.unwrap_err();
        assert!(
            matches!(err, DeploymentError::NetworkFailure(_)),
            "{signer:?}: {err:?}"
        );
    }
}

#[tokio::test]
async fn unreachable_node_exits_with_failure() {
    let err = deployer::run(arguments(UNREACHABLE, &[])).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DeploymentError>(),
        Some(DeploymentError::NetworkFailure(_))
    ));

    assert_eq!(
        deployer::main(arguments(UNREACHABLE, &[])).await,
        ExitCode::FAILURE
    );
}

#[tokio::test]
async fn unknown_contract_fails_before_connecting() {
    let err = deployer::run(arguments(UNREACHABLE, &["UniswapV3Factory", "Quoter"]))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DeploymentError>(),
        Some(DeploymentError::UnknownContract(name)) if name == "Quoter"
    ));

    assert_eq!(
        deployer::main(arguments(UNREACHABLE, &["Quoter"])).await,
        ExitCode::FAILURE
    );
}

#[tokio::test]
async fn interface_cannot_be_deployed() {
    let deployer = Deployer::new(Artifacts::new(artifacts()), Arc::new(node(None)));
    let err = deployer.deploy("IUniswapV3Pool").await.unwrap_err();
    assert!(matches!(err, DeploymentError::InvalidInvocation { .. }));
}

/// Accepts connections and never answers on them.
async fn silent_node() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let mut connections = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            connections.push(socket);
        }
    });
    url
}

#[tokio::test]
async fn silent_node_times_out() {
    let url = silent_node().await;
    for signer in [None, Some(DEV_KEY)] {
        let node = Node::new(
            url.parse().unwrap(),
            signer.map(|key| key.parse().unwrap()),
            1,
            Duration::from_millis(200),
        );

        let deployment = tokio::time::timeout(
            Duration::from_secs(10),
            node.send_deployment(Bytes::from_static(&[0x00])),
        )
        .await
        .expect("deployment outlived its timeout");
        assert!(
            matches!(deployment, Err(DeploymentError::NetworkFailure(_))),
            "{signer:?}: {deployment:?}"
        );

        let chain_id = tokio::time::timeout(Duration::from_secs(10), node.chain_id())
            .await
            .expect("chain id request outlived its timeout");
        assert!(matches!(chain_id, Err(DeploymentError::NetworkFailure(_))));
    }
}
