use {
    crate::{deployer::DEFAULT_CONTRACT, traits::ConfirmationPolicy},
    alloy::{primitives::Address, signers::local::PrivateKeySigner},
    std::{path::PathBuf, time::Duration},
    url::Url,
};

/// Loads `.env` from the working directory or one of its parents into the
/// process environment, so the `env` fallbacks below can be kept in a file.
/// Variables that are already set keep their value.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

#[derive(clap::Parser)]
pub struct LoggingArguments {
    #[clap(
        long,
        env,
        default_value = "warn,token_deployer=info,contracts=info,ethrpc=info"
    )]
    pub log_filter: String,

    /// Output log events as JSON.
    #[clap(long, env)]
    pub log_json: bool,
}

#[derive(clap::Parser)]
#[clap(name = "deploy-token", about = "Deploys the Crypto Devs token contract")]
pub struct Arguments {
    #[clap(flatten)]
    pub logging: LoggingArguments,

    /// The Ethereum node URL to connect to. This selects the network the
    /// contract gets deployed on.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Hex encoded private key of the deploying account. Without it the
    /// node's first unlocked account is used.
    #[clap(long, env, hide_env_values = true)]
    pub private_key: Option<PrivateKeySigner>,

    /// TOML file with the addresses of previously deployed contracts.
    #[clap(long, env)]
    pub config: Option<PathBuf>,

    /// Address of the Crypto Devs NFT contract. Overrides the value of the
    /// constants file.
    #[clap(long, env = "CRYPTO_DEVS_NFT_CONTRACT_ADDRESS")]
    pub nft_contract_address: Option<Address>,

    /// Hardhat artifacts directory the compiled contract is read from.
    #[clap(long, env, default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// Name of the contract to deploy, either bare or fully qualified
    /// (`contracts/CryptoDevToken.sol:CryptoDevToken`).
    #[clap(long, env, default_value = DEFAULT_CONTRACT)]
    pub contract: String,

    /// Number of blocks, including the inclusion block, to wait for.
    #[clap(
        long,
        env,
        default_value = "1",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub confirmations: u64,

    /// How long to wait for the confirmations before giving up.
    #[clap(
        long,
        env,
        default_value = "5m",
        value_parser = humantime::parse_duration,
    )]
    pub confirmation_timeout: Duration,
}

impl Arguments {
    pub fn confirmation_policy(&self) -> ConfirmationPolicy {
        ConfirmationPolicy {
            confirmations: self.confirmations,
            timeout: self.confirmation_timeout,
        }
    }
}

impl std::fmt::Display for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self {
            logging,
            node_url,
            private_key,
            config,
            nft_contract_address,
            artifacts,
            contract,
            confirmations,
            confirmation_timeout,
        } = self;

        writeln!(f, "log_filter: {}", logging.log_filter)?;
        writeln!(f, "log_json: {}", logging.log_json)?;
        writeln!(f, "node_url: {node_url}")?;
        match private_key {
            Some(signer) => writeln!(f, "private_key: SECRET ({})", signer.address())?,
            None => writeln!(f, "private_key: None")?,
        }
        writeln!(f, "config: {config:?}")?;
        writeln!(f, "nft_contract_address: {nft_contract_address:?}")?;
        writeln!(f, "artifacts: {}", artifacts.display())?;
        writeln!(f, "contract: {contract}")?;
        writeln!(f, "confirmations: {confirmations}")?;
        writeln!(f, "confirmation_timeout: {confirmation_timeout:?}")?;
        Ok(())
    }
}
