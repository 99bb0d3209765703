use {clap::Parser, std::process::ExitCode};

#[tokio::main]
async fn main() -> ExitCode {
    let args = deployer::arguments::Arguments::parse();
    observe::tracing::initialize(&observe::Config::new(
        &args.log_filter,
        args.log_stderr_threshold.into_level(),
        args.use_json_logs,
    ));
    tracing::info!("running deployer with validated arguments:\n{}", args);
    deployer::main(args).await
}
