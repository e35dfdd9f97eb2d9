//! Trait definitions for external system boundaries.
//!
//! These traits abstract artifact loading and blockchain interactions so the
//! deployment flow can be unit tested with mocks.

use {
    crate::deployer::DeploymentResult,
    alloy::{dyn_abi::DynSolValue, primitives::TxHash},
    anyhow::Result,
    contracts::{Artifacts, DeploymentRequest},
    std::time::Duration,
};

/// A contract creation transaction the node accepted but which is not
/// confirmed yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Submitted {
    pub tx_hash: TxHash,
}

/// How long and how deep to wait for a submitted transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    /// Number of blocks, including the one the transaction was mined in,
    /// before it counts as confirmed.
    pub confirmations: u64,
    /// Give up waiting after this long. The transaction stays in flight.
    pub timeout: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            confirmations: 1,
            timeout: Duration::from_secs(5 * 60),
        }
    }
}

/// Turns compiled contracts into deployable requests. Performs no network I/O.
pub trait ArtifactFactory: Send + Sync {
    fn deployment(
        &self,
        contract: &str,
        constructor_args: Vec<DynSolValue>,
    ) -> Result<DeploymentRequest>;
}

impl ArtifactFactory for Artifacts {
    fn deployment(
        &self,
        contract: &str,
        constructor_args: Vec<DynSolValue>,
    ) -> Result<DeploymentRequest> {
        let artifact = self.load(contract)?;
        DeploymentRequest::new(&artifact, constructor_args)
    }
}

/// Abstracts blockchain write operations.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait::async_trait]
pub trait Network: Send + Sync {
    /// Signs and broadcasts the contract creation. Returns as soon as the
    /// node accepted the transaction.
    async fn submit(&self, request: &DeploymentRequest) -> Result<Submitted>;

    /// Waits until the transaction is mined with the requested depth and
    /// returns the address of the created contract.
    ///
    /// Fails if the transaction reverted, got dropped, or did not confirm
    /// within the policy's timeout.
    async fn confirm(
        &self,
        submitted: Submitted,
        policy: ConfirmationPolicy,
    ) -> Result<DeploymentResult>;
}
