//! Ordered deployment plans.
//!
//! A plan is a list of steps deployed one after the other. Constructor
//! arguments can refer to contracts deployed by earlier steps with
//! `"${label}"`, e.g.
//!
//! ```toml
//! [[steps]]
//! contract = "UniswapV3Factory"
//! label = "factory"
//!
//! [[steps]]
//! contract = "SwapRouter"
//! args = ["${factory}", "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"]
//! ```

use {
    crate::error::DeploymentError,
    alloy::primitives::Address,
    anyhow::{Context, Result, anyhow, bail, ensure},
    serde::{Deserialize, Serialize},
    std::{
        collections::HashMap,
        fmt::{self, Display, Formatter},
        path::Path,
    },
};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Plan {
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Step {
    /// Name of the contract artifact to deploy.
    pub contract: String,
    /// Name other steps use to refer to this deployment. Defaults to the
    /// contract name.
    #[serde(default)]
    pub label: Option<String>,
    /// Constructor arguments.
    #[serde(default)]
    pub args: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Argument {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl Display for Argument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl Argument {
    /// Label of the earlier step this argument refers to, if any.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Text(text) => text.strip_prefix("${")?.strip_suffix('}'),
            _ => None,
        }
    }
}

impl Step {
    pub fn new(contract: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            label: None,
            args: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.contract)
    }

    /// Renders the constructor arguments, substituting references with the
    /// addresses of already deployed contracts.
    pub fn resolve_args(
        &self,
        deployed: &HashMap<String, Address>,
    ) -> Result<Vec<String>, DeploymentError> {
        self.args
            .iter()
            .map(|arg| match arg.reference() {
                Some(label) => deployed
                    .get(label)
                    .map(|address| address.to_string())
                    .ok_or_else(|| {
                        DeploymentError::invalid_invocation(
                            &self.contract,
                            format!("reference to {label:?} which has not been deployed"),
                        )
                    }),
                None => Ok(arg.to_string()),
            })
            .collect()
    }
}

impl Plan {
    /// One step per contract, no constructor arguments.
    pub fn from_contracts<S: AsRef<str>>(contracts: &[S]) -> Self {
        Self {
            steps: contracts
                .iter()
                .map(|contract| Step::new(contract.as_ref()))
                .collect(),
        }
    }

    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read plan {}", path.as_ref().display()))?;
        match toml::from_str(&contents) {
            Ok(self_) => Ok(self_),
            Err(err) if std::env::var("TOML_TRACE_ERROR").is_ok_and(|v| v == "1") => Err(anyhow!(
                "failed to parse TOML plan at {}: {err:#?}",
                path.as_ref().display()
            )),
            Err(_) => Err(anyhow!(
                "failed to parse TOML plan at: {}. Set TOML_TRACE_ERROR=1 to print parsing \
                 error but this may leak secrets.",
                path.as_ref().display()
            )),
        }
    }

    pub fn validate(self) -> Result<Self> {
        ensure!(!self.steps.is_empty(), "deployment plan has no steps");
        // Labels may repeat (deploying a contract twice is fine) as long as no
        // step refers to a repeated one.
        let mut labels = HashMap::<&str, usize>::new();
        for (i, step) in self.steps.iter().enumerate() {
            for arg in &step.args {
                if let Some(reference) = arg.reference() {
                    match labels.get(reference) {
                        Some(1) => (),
                        Some(_) => bail!(
                            "step {i} ({}) refers to {reference:?} which labels more than one \
                             earlier step",
                            step.label()
                        ),
                        None => bail!(
                            "step {i} ({}) refers to {reference:?} which is not deployed by an \
                             earlier step",
                            step.label()
                        ),
                    }
                }
            }
            *labels.entry(step.label()).or_default() += 1;
        }
        Ok(self)
    }
}
