//! Compiled contract artifacts and the deployment requests built from them.
//!
//! The artifacts are read as emitted by Hardhat's compiler task, so this crate
//! never compiles Solidity itself.

pub mod artifact;
pub mod deployment;

pub use {
    artifact::{Artifacts, ContractArtifact},
    deployment::DeploymentRequest,
};
