use {
    crate::traits::{ArtifactFactory, ConfirmationPolicy, Network},
    alloy::{
        dyn_abi::DynSolValue,
        primitives::{Address, TxHash},
    },
    std::{fmt, sync::Arc},
};

/// Contract deployed when nothing else is configured.
pub const DEFAULT_CONTRACT: &str = "CryptoDevToken";

/// A contract creation that made it on chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeploymentResult {
    pub address: Address,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}

impl fmt::Display for DeploymentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Crypto Devs Token Contract Address: {}", self.address)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeploymentError {
    #[error("no Crypto Devs NFT contract address configured")]
    ConfigurationMissing,
    #[error("invalid configuration")]
    Configuration(#[source] anyhow::Error),
    #[error("could not prepare deployment of {contract}")]
    Artifact {
        contract: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("deployment transaction was rejected")]
    NetworkSubmission(#[source] anyhow::Error),
    #[error("deployment transaction {tx_hash} did not confirm")]
    Confirmation {
        tx_hash: TxHash,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Address of the previously deployed NFT contract the token is bound to.
    pub nft_contract: Option<Address>,
    /// Name of the contract artifact to deploy.
    pub contract: String,
    pub confirmation: ConfirmationPolicy,
}

impl Config {
    pub fn new(nft_contract: Option<Address>) -> Self {
        Self {
            nft_contract,
            contract: DEFAULT_CONTRACT.to_string(),
            confirmation: Default::default(),
        }
    }
}

/// Deploys the token contract exactly once per [`Deployer::run`] call.
pub struct Deployer {
    config: Config,
    artifacts: Arc<dyn ArtifactFactory>,
    network: Arc<dyn Network>,
}

impl Deployer {
    pub fn new(
        config: Config,
        artifacts: Arc<dyn ArtifactFactory>,
        network: Arc<dyn Network>,
    ) -> Self {
        Self {
            config,
            artifacts,
            network,
        }
    }

    /// Submits one deployment transaction and waits for it to confirm.
    ///
    /// Not idempotent: every call creates a new contract instance. Once the
    /// transaction is submitted it can't be taken back, so a confirmation
    /// error leaves its outcome to be checked by the caller.
    pub async fn run(&self) -> Result<DeploymentResult, DeploymentError> {
        let nft_contract = self
            .config
            .nft_contract
            .ok_or(DeploymentError::ConfigurationMissing)?;
        let request = self
            .artifacts
            .deployment(
                &self.config.contract,
                vec![DynSolValue::Address(nft_contract)],
            )
            .map_err(|source| DeploymentError::Artifact {
                contract: self.config.contract.clone(),
                source,
            })?;

        tracing::info!(contract = %request.contract, %nft_contract, "submitting deployment");
        let submitted = self
            .network
            .submit(&request)
            .await
            .map_err(DeploymentError::NetworkSubmission)?;

        let policy = self.config.confirmation;
        tracing::info!(
            tx_hash = %submitted.tx_hash,
            confirmations = policy.confirmations,
            timeout = ?policy.timeout,
            "deployment submitted, waiting for confirmation"
        );
        let confirmed =
            match tokio::time::timeout(policy.timeout, self.network.confirm(submitted, policy))
                .await
            {
                Ok(confirmed) => confirmed,
                Err(_) => Err(anyhow::anyhow!(
                    "not confirmed after {:?}, the transaction may still be mined",
                    policy.timeout
                )),
            };
        let result = confirmed.map_err(|source| DeploymentError::Confirmation {
            tx_hash: submitted.tx_hash,
            source,
        })?;

        tracing::info!(
            address = %result.address,
            block = ?result.block_number,
            "deployment confirmed"
        );
        Ok(result)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use {
        super::*,
        crate::traits::{MockNetwork, Submitted},
        alloy::primitives::{B256, address},
        contracts::{ContractArtifact, DeploymentRequest},
        std::time::Duration,
    };

    pub const NFT_CONTRACT: Address = address!("0xabcd000000000000000000000000000000001234");
    pub const TOKEN_CONTRACT: Address = address!("0x9999999999999999999999999999999999990000");

    pub const TOKEN_ARTIFACT: &str = r#"{
        "contractName": "CryptoDevToken",
        "sourceName": "contracts/CryptoDevToken.sol",
        "abi": [
            {
                "inputs": [{ "internalType": "address", "name": "cryptoDevsContract", "type": "address" }],
                "stateMutability": "nonpayable",
                "type": "constructor"
            }
        ],
        "bytecode": "0x60806040",
        "linkReferences": {}
    }"#;

    /// An artifact loaded up front only deploys itself.
    impl ArtifactFactory for ContractArtifact {
        fn deployment(
            &self,
            contract: &str,
            constructor_args: Vec<DynSolValue>,
        ) -> anyhow::Result<DeploymentRequest> {
            let name = contract.rsplit(':').next().unwrap_or(contract);
            anyhow::ensure!(
                name == self.contract_name,
                "requested {contract} but the artifact is {}",
                self.contract_name
            );
            DeploymentRequest::new(self, constructor_args)
        }
    }

    pub fn artifact() -> Arc<dyn ArtifactFactory> {
        Arc::new(ContractArtifact::from_json(TOKEN_ARTIFACT).unwrap())
    }

    pub fn deployer(nft_contract: Option<Address>, network: impl Network + 'static) -> Deployer {
        Deployer::new(Config::new(nft_contract), artifact(), Arc::new(network))
    }

    fn deploys_with(request: &DeploymentRequest, nft_contract: Address) -> bool {
        request.contract == DEFAULT_CONTRACT
            && request.constructor_args == vec![DynSolValue::Address(nft_contract)]
    }

    #[tokio::test]
    async fn submits_once_with_nft_address() {
        observe::tracing::initialize_reentrant("token_deployer=debug");

        let tx_hash = B256::repeat_byte(1);
        let mut network = MockNetwork::new();
        network
            .expect_submit()
            .times(1)
            .withf(|request| deploys_with(request, NFT_CONTRACT))
            .returning(move |_| Ok(Submitted { tx_hash }));
        network
            .expect_confirm()
            .times(1)
            .withf(move |submitted, policy| {
                submitted.tx_hash == tx_hash && *policy == ConfirmationPolicy::default()
            })
            .returning(|submitted, _| {
                Ok(DeploymentResult {
                    address: TOKEN_CONTRACT,
                    tx_hash: submitted.tx_hash,
                    block_number: Some(7),
                })
            });

        let result = deployer(Some(NFT_CONTRACT), network).run().await.unwrap();
        assert_eq!(
            result,
            DeploymentResult {
                address: TOKEN_CONTRACT,
                tx_hash,
                block_number: Some(7),
            }
        );
    }

    #[tokio::test]
    async fn missing_nft_address_never_submits() {
        let mut network = MockNetwork::new();
        network.expect_submit().never();
        network.expect_confirm().never();

        let err = deployer(None, network).run().await.unwrap_err();
        assert!(matches!(err, DeploymentError::ConfigurationMissing));
    }

    #[tokio::test]
    async fn unknown_contract_never_submits() {
        let mut network = MockNetwork::new();
        network.expect_submit().never();

        let mut config = Config::new(Some(NFT_CONTRACT));
        config.contract = "CryptoDevs".to_string();
        let err = Deployer::new(config, artifact(), Arc::new(network))
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, DeploymentError::Artifact { .. }));
    }

    #[tokio::test]
    async fn rejected_submission() {
        let mut network = MockNetwork::new();
        network
            .expect_submit()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("insufficient funds for gas * price + value")));
        network.expect_confirm().never();

        let err = deployer(Some(NFT_CONTRACT), network)
            .run()
            .await
            .unwrap_err();
        let DeploymentError::NetworkSubmission(source) = err else {
            panic!("unexpected error variant");
        };
        assert_eq!(source.to_string(), "insufficient funds for gas * price + value");
    }

    #[tokio::test]
    async fn reverted_deployment_carries_tx_hash() {
        let tx_hash = B256::repeat_byte(2);
        let mut network = MockNetwork::new();
        network
            .expect_submit()
            .returning(move |_| Ok(Submitted { tx_hash }));
        network
            .expect_confirm()
            .returning(|_, _| Err(anyhow::anyhow!("execution reverted")));

        let err = deployer(Some(NFT_CONTRACT), network)
            .run()
            .await
            .unwrap_err();
        match err {
            DeploymentError::Confirmation {
                tx_hash: failed,
                source,
            } => {
                assert_eq!(failed, tx_hash);
                assert_eq!(source.to_string(), "execution reverted");
            }
            err => panic!("unexpected error {err:?}"),
        }
    }

    #[tokio::test]
    async fn every_run_deploys_a_new_contract() {
        let mut network = MockNetwork::new();
        let mut nonce = 0u8;
        network.expect_submit().times(2).returning(move |_| {
            nonce += 1;
            Ok(Submitted {
                tx_hash: B256::repeat_byte(nonce),
            })
        });
        network.expect_confirm().times(2).returning(|submitted, _| {
            Ok(DeploymentResult {
                address: Address::from_word(submitted.tx_hash),
                tx_hash: submitted.tx_hash,
                block_number: None,
            })
        });

        let deployer = deployer(Some(NFT_CONTRACT), network);
        let first = deployer.run().await.unwrap();
        let second = deployer.run().await.unwrap();
        assert_ne!(first.address, second.address);
        assert_ne!(first.tx_hash, second.tx_hash);
    }

    /// Node that accepts the transaction but never mines it.
    struct StuckNetwork;

    #[async_trait::async_trait]
    impl Network for StuckNetwork {
        async fn submit(&self, _: &DeploymentRequest) -> anyhow::Result<Submitted> {
            Ok(Submitted {
                tx_hash: B256::repeat_byte(3),
            })
        }

        async fn confirm(
            &self,
            _: Submitted,
            _: ConfirmationPolicy,
        ) -> anyhow::Result<DeploymentResult> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_waiting_after_timeout() {
        let mut config = Config::new(Some(NFT_CONTRACT));
        config.confirmation.timeout = Duration::from_secs(30);
        let deployer = Deployer::new(config, artifact(), Arc::new(StuckNetwork));

        let err = deployer.run().await.unwrap_err();
        let DeploymentError::Confirmation { tx_hash, source } = err else {
            panic!("unexpected error variant");
        };
        assert_eq!(tx_hash, B256::repeat_byte(3));
        assert!(source.to_string().contains("not confirmed after 30s"));
    }

    #[test]
    fn displays_deployed_address() {
        let result = DeploymentResult {
            address: TOKEN_CONTRACT,
            tx_hash: Default::default(),
            block_number: None,
        };
        assert_eq!(
            result.to_string(),
            "Crypto Devs Token Contract Address: 0x9999999999999999999999999999999999990000"
        );
    }
}
