use {
    crate::deployer::DeploymentResult,
    anyhow::{Context, Result},
    serde::Serialize,
    std::path::Path,
};

/// Record of a completed deployment plan.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest<'a> {
    pub chain_id: u64,
    pub deployments: &'a [DeploymentResult],
}

impl Manifest<'_> {
    pub async fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("failed to write manifest {}", path.as_ref().display()))
    }
}
