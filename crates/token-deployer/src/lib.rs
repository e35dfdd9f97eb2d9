pub mod arguments;
pub mod config;
pub mod deployer;
pub mod submitter;
pub mod traits;

use {
    crate::{
        deployer::{Config, Deployer, DeploymentError, DeploymentResult},
        submitter::{AlloyNetwork, Sender},
    },
    contracts::Artifacts,
    std::{io::Write, sync::Arc},
};

/// Runs the deployment described by `args` and reports its outcome on the
/// process' stdout/stderr. Returns the exit code.
pub async fn main(args: arguments::Arguments) -> u8 {
    let result = run(args).await;
    report(result, &mut std::io::stdout(), &mut std::io::stderr())
}

/// Wires up the collaborators from the command line and deploys once.
pub async fn run(args: arguments::Arguments) -> Result<DeploymentResult, DeploymentError> {
    let nft_contract =
        config::nft_contract_address(args.nft_contract_address, args.config.as_deref())
            .await
            .map_err(DeploymentError::Configuration)?;

    let sender = match args.private_key {
        Some(_) => Sender::Wallet,
        None => Sender::NodeAccount,
    };
    let provider = ethrpc::provider(&args.node_url, "deployer", args.private_key.clone());
    let network = AlloyNetwork::new(provider, sender);

    let config = Config {
        nft_contract,
        contract: args.contract.clone(),
        confirmation: args.confirmation_policy(),
    };
    Deployer::new(
        config,
        Arc::new(Artifacts::new(&args.artifacts)),
        Arc::new(network),
    )
    .run()
    .await
}

/// Writes the deployed address to `stdout` or the error with all of its
/// causes to `stderr`.
pub fn report(
    result: Result<DeploymentResult, DeploymentError>,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> u8 {
    match result {
        Ok(deployment) => {
            tracing::debug!(tx_hash = %deployment.tx_hash, "reporting deployment");
            match writeln!(stdout, "{deployment}") {
                Ok(()) => 0,
                Err(err) => {
                    tracing::error!(?err, "failed to report deployed address");
                    1
                }
            }
        }
        Err(err) => {
            let err = anyhow::Error::new(err);
            tracing::error!(?err, "deployment failed");
            // Nothing left to report to if stderr is gone.
            let _ = writeln!(stderr, "Error: {err:?}");
            1
        }
    }
}
