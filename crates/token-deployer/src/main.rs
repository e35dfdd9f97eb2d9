use {clap::Parser, std::process::ExitCode};

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = token_deployer::arguments::load_dotenv();
    let args = token_deployer::arguments::Arguments::parse();
    let mut logging = observe::Config::default().with_env_filter(&args.logging.log_filter);
    if args.logging.log_json {
        logging = logging.with_json_format();
    }
    observe::tracing::initialize(&logging);
    if let Some(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }
    tracing::info!("running token deployer with arguments:\n{}", args);
    ExitCode::from(token_deployer::main(args).await)
}
