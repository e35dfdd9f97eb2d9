//! Sends the contract creation through an alloy provider and follows it until
//! it is mined.

use {
    crate::{
        deployer::DeploymentResult,
        traits::{ConfirmationPolicy, Network, Submitted},
    },
    alloy::{
        network::TransactionBuilder,
        primitives::{Address, TxHash},
        providers::{PendingTransactionBuilder, PendingTransactionError, Provider},
        rpc::types::TransactionRequest,
        transports::RpcError,
    },
    anyhow::{Context, Result, anyhow, bail},
    contracts::DeploymentRequest,
    ethrpc::AlloyProvider,
};

/// Who pays for the deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    /// The provider signs with its own wallet.
    Wallet,
    /// The node signs with the first account it manages.
    NodeAccount,
}

pub struct AlloyNetwork {
    provider: AlloyProvider,
    sender: Sender,
}

impl AlloyNetwork {
    pub fn new(provider: AlloyProvider, sender: Sender) -> Self {
        Self { provider, sender }
    }

    async fn node_account(&self) -> Result<Address> {
        let accounts = self
            .provider
            .get_accounts()
            .await
            .context("could not fetch the node's accounts")?;
        accounts
            .first()
            .copied()
            .context("node manages no accounts, configure a private key")
    }
}

#[async_trait::async_trait]
impl Network for AlloyNetwork {
    async fn submit(&self, request: &DeploymentRequest) -> Result<Submitted> {
        let mut tx = TransactionRequest::default().with_deploy_code(request.init_code());
        if self.sender == Sender::NodeAccount {
            let from = self.node_account().await?;
            tracing::debug!(%from, "deploying from node account");
            tx = tx.with_from(from);
        }

        tracing::debug!(
            contract = %request.contract,
            constructor_args = %request.encoded_args(),
            "sending contract creation"
        );
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .with_context(|| format!("could not send deployment of {}", request.contract))?;
        Ok(Submitted {
            tx_hash: *pending.tx_hash(),
        })
    }

    async fn confirm(
        &self,
        submitted: Submitted,
        policy: ConfirmationPolicy,
    ) -> Result<DeploymentResult> {
        let tx_hash = submitted.tx_hash;
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .with_required_confirmations(policy.confirmations)
            .with_timeout(Some(policy.timeout))
            .get_receipt()
            .await
            .map_err(|err| confirmation_error(tx_hash, err))?;
        deployment_result(
            tx_hash,
            receipt.status(),
            receipt.contract_address,
            receipt.block_number,
        )
    }
}

fn confirmation_error(tx_hash: TxHash, err: PendingTransactionError) -> anyhow::Error {
    match err {
        // Mined according to the block watcher but the node has no receipt.
        PendingTransactionError::TransportError(RpcError::NullResp) => {
            anyhow!("no receipt for {tx_hash}, the transaction was dropped or replaced")
        }
        err => anyhow::Error::new(err).context("deployment transaction was not mined"),
    }
}

fn deployment_result(
    tx_hash: TxHash,
    success: bool,
    contract_address: Option<Address>,
    block_number: Option<u64>,
) -> Result<DeploymentResult> {
    if !success {
        bail!("deployment transaction {tx_hash} reverted");
    }
    let address = contract_address
        .with_context(|| format!("receipt of {tx_hash} does not contain a contract address"))?;
    Ok(DeploymentResult {
        address,
        tx_hash,
        block_number,
    })
}
