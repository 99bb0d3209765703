use {
    alloy::signers::local::PrivateKeySigner,
    clap::Parser,
    std::{
        fmt::{self, Display, Formatter},
        path::PathBuf,
        time::Duration,
    },
    tracing::level_filters::LevelFilter,
    url::Url,
};

#[derive(Parser)]
#[clap(name = "deploy", about = "Deploys compiled contracts and reports their addresses")]
pub struct Arguments {
    /// Contracts to deploy, in order, without constructor arguments.
    #[clap(default_value = "UniswapV3Factory", conflicts_with = "plan")]
    pub contracts: Vec<String>,

    /// TOML deployment plan. Use it instead of positional contract names when
    /// constructors need arguments or the addresses of earlier deployments.
    #[clap(long, env)]
    pub plan: Option<PathBuf>,

    /// Directory containing the compiled contract artifacts.
    #[clap(long, env, default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Key used to sign deployment transactions. Without it transactions
    /// are sent from the node's first unlocked account.
    #[clap(long, env)]
    pub private_key: Option<PrivateKeySigner>,

    /// Abort unless the node reports this chain ID.
    #[clap(long, env)]
    pub chain_id: Option<u64>,

    /// Number of confirmations to wait for on every deployment.
    #[clap(long, env, default_value = "1")]
    pub confirmations: u64,

    /// How long to wait for a deployment to be confirmed.
    #[clap(long, env, default_value = "5m", value_parser = humantime::parse_duration)]
    pub confirmation_timeout: Duration,

    /// Write a JSON manifest of the deployed contracts here once every
    /// deployment succeeded.
    #[clap(long, env)]
    pub manifest: Option<PathBuf>,

    #[clap(long, env, default_value = "warn,deploy=info,deployer=info")]
    pub log_filter: String,

    #[clap(long, env, default_value = "error")]
    pub log_stderr_threshold: LevelFilter,

    /// Output log events as JSON.
    #[clap(long, env)]
    pub use_json_logs: bool,
}

pub fn display_option(
    f: &mut Formatter<'_>,
    name: &str,
    option: &Option<impl Display>,
) -> fmt::Result {
    write!(f, "{name}: ")?;
    match option {
        Some(display) => writeln!(f, "{display}"),
        None => writeln!(f, "None"),
    }
}

pub fn display_secret_option<T>(f: &mut Formatter<'_>, name: &str, option: &Option<T>) -> fmt::Result {
    display_option(f, name, &option.as_ref().map(|_| "SECRET"))
}

// We have a custom Display implementation so that we can log the arguments on
// start up without leaking the private key.
impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            contracts,
            plan,
            artifacts,
            node_url,
            private_key,
            chain_id,
            confirmations,
            confirmation_timeout,
            manifest,
            log_filter,
            log_stderr_threshold,
            use_json_logs,
        } = self;

        writeln!(f, "contracts: [{}]", contracts.join(", "))?;
        display_option(f, "plan", &plan.as_ref().map(|path| path.display()))?;
        writeln!(f, "artifacts: {}", artifacts.display())?;
        writeln!(f, "node_url: {node_url}")?;
        display_secret_option(f, "private_key", private_key)?;
        display_option(f, "chain_id", chain_id)?;
        writeln!(f, "confirmations: {confirmations}")?;
        writeln!(f, "confirmation_timeout: {confirmation_timeout:?}")?;
        display_option(f, "manifest", &manifest.as_ref().map(|path| path.display()))?;
        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "log_stderr_threshold: {log_stderr_threshold}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")?;
        Ok(())
    }
}
