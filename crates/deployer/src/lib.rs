pub mod arguments;
pub mod artifact;
pub mod chain;
pub mod deployer;
pub mod error;
pub mod manifest;
pub mod plan;
mod run;

pub use {
    artifact::{Artifacts, ContractArtifact},
    chain::{Chain, Confirmation, Node},
    deployer::{Deployer, DeploymentResult},
    error::DeploymentError,
    plan::{Plan, Step},
    run::{main, run},
};
