//! Constants file holding addresses of previously deployed contracts.

use {
    alloy::primitives::Address,
    anyhow::anyhow,
    serde::Deserialize,
    std::path::Path,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Constants {
    /// Address of the Crypto Devs NFT contract the token contract is bound to.
    pub crypto_devs_nft_contract_address: Option<Address>,
}

impl Constants {
    pub async fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = tokio::fs::read_to_string(&path).await.map_err(|err| {
            anyhow!(
                "failed to read constants file {}: {err}",
                path.as_ref().display()
            )
        })?;
        match toml::from_str(&content) {
            Ok(self_) => Ok(self_),
            Err(err) if std::env::var("TOML_TRACE_ERROR").is_ok_and(|v| v == "1") => Err(anyhow!(
                "failed to parse TOML constants at {}: {err:#?}",
                path.as_ref().display()
            )),
            Err(_) => Err(anyhow!(
                "failed to parse TOML constants at: {}. Set TOML_TRACE_ERROR=1 to print parsing \
                 error but this may leak secrets.",
                path.as_ref().display()
            )),
        }
    }
}

/// Resolves the NFT contract address. An explicitly passed address wins over
/// the constants file. `None` means neither source provides one.
pub async fn nft_contract_address(
    explicit: Option<Address>,
    constants: Option<&Path>,
) -> anyhow::Result<Option<Address>> {
    if let Some(address) = explicit {
        return Ok(Some(address));
    }
    match constants {
        Some(path) => Ok(Constants::from_path(path)
            .await?
            .crypto_devs_nft_contract_address),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::primitives::address,
        std::io::Write,
        tempfile::NamedTempFile,
    };

    const NFT: Address = address!("0x2d6a2e9ec5d3c4a3f6a1b1e2b1c0f5c3e8a7d6c5");

    fn constants_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn reads_address_from_constants() {
        let file = constants_file(
            r#"crypto-devs-nft-contract-address = "0x2d6a2e9ec5d3c4a3f6a1b1e2b1c0f5c3e8a7d6c5""#,
        );
        assert_eq!(
            nft_contract_address(None, Some(file.path())).await.unwrap(),
            Some(NFT)
        );
    }

    #[tokio::test]
    async fn explicit_address_wins() {
        let file = constants_file(
            r#"crypto-devs-nft-contract-address = "0x0000000000000000000000000000000000000001""#,
        );
        assert_eq!(
            nft_contract_address(Some(NFT), Some(file.path()))
                .await
                .unwrap(),
            Some(NFT)
        );
    }

    #[tokio::test]
    async fn absent_address() {
        assert_eq!(nft_contract_address(None, None).await.unwrap(), None);

        let file = constants_file("");
        assert_eq!(
            nft_contract_address(None, Some(file.path())).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn rejects_malformed_address() {
        let file = constants_file(r#"crypto-devs-nft-contract-address = "0x1234""#);
        assert!(Constants::from_path(file.path()).await.is_err());
    }

    #[tokio::test]
    async fn rejects_unknown_constants() {
        let file = constants_file(r#"whitelist-contract-address = "0x1234""#);
        assert!(Constants::from_path(file.path()).await.is_err());
    }

    #[tokio::test]
    async fn missing_constants_file() {
        let err = Constants::from_path("/does/not/exist.toml")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
