mod instrumentation;

use {
    crate::AlloyProvider,
    alloy::{
        network::EthereumWallet,
        providers::{Provider, ProviderBuilder},
        rpc::client::ClientBuilder,
        signers::local::PrivateKeySigner,
    },
    instrumentation::InstrumentationLayer,
    url::Url,
};

/// Creates a provider talking to the node at `url`.
///
/// With a `signer`, transactions are signed locally and sent raw. Without
/// one they are sent with `eth_sendTransaction` and the node has to manage
/// the sending account, which is how local development nodes work.
pub fn provider(url: &Url, label: &str, signer: Option<PrivateKeySigner>) -> AlloyProvider {
    let rpc = ClientBuilder::default()
        .layer(InstrumentationLayer {
            label: label.to_string(),
        })
        .http(url.clone());
    match signer {
        Some(signer) => {
            tracing::debug!(account = %signer.address(), "using local signer");
            ProviderBuilder::new()
                .wallet(EthereumWallet::new(signer))
                .connect_client(rpc)
                .erased()
        }
        None => ProviderBuilder::new().connect_client(rpc).erased(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_node_provider() {
        let url = "http://localhost:8545".parse().unwrap();
        let provider = provider(&url, "test", None);
        assert!(provider.client().is_local());
    }

    #[tokio::test]
    async fn remote_node_provider_with_signer() {
        let url = "https://rpc.sepolia.org".parse().unwrap();
        let signer: PrivateKeySigner =
            "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d"
                .parse()
                .unwrap();
        let provider = provider(&url, "test", Some(signer));
        assert!(!provider.client().is_local());
    }
}
