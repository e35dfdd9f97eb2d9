use {
    crate::ContractArtifact,
    alloy::{
        dyn_abi::{DynSolValue, JsonAbiExt},
        primitives::Bytes,
    },
    anyhow::{Context, Result, ensure},
};

/// A contract creation ready to be sent: the creation bytecode of a contract
/// together with the constructor arguments it gets deployed with.
#[derive(Clone, Debug, PartialEq)]
pub struct DeploymentRequest {
    pub contract: String,
    pub bytecode: Bytes,
    pub constructor_args: Vec<DynSolValue>,
    encoded_args: Bytes,
}

impl DeploymentRequest {
    /// Builds the request, ABI encoding `constructor_args` against the
    /// artifact's constructor.
    pub fn new(artifact: &ContractArtifact, constructor_args: Vec<DynSolValue>) -> Result<Self> {
        let name = &artifact.contract_name;
        ensure!(
            !artifact.bytecode.is_empty(),
            "{name} has no bytecode, it is either abstract or an interface"
        );
        ensure!(
            artifact.link_references.is_empty(),
            "{name} needs to be linked against libraries {:?}",
            artifact.link_references.keys().collect::<Vec<_>>()
        );

        let encoded_args = match &artifact.abi.constructor {
            Some(constructor) => constructor
                .abi_encode_input(&constructor_args)
                .with_context(|| {
                    format!(
                        "constructor arguments do not match {name}({})",
                        constructor
                            .inputs
                            .iter()
                            .map(|param| param.ty.as_str())
                            .collect::<Vec<_>>()
                            .join(",")
                    )
                })?,
            None => {
                ensure!(
                    constructor_args.is_empty(),
                    "{name} has no constructor but {} arguments were given",
                    constructor_args.len()
                );
                Vec::new()
            }
        };

        Ok(Self {
            contract: name.clone(),
            bytecode: artifact.bytecode.clone(),
            constructor_args,
            encoded_args: encoded_args.into(),
        })
    }

    /// ABI encoded constructor arguments.
    pub fn encoded_args(&self) -> &Bytes {
        &self.encoded_args
    }

    /// Creation bytecode followed by the encoded constructor arguments, i.e.
    /// the `input` of the creation transaction.
    pub fn init_code(&self) -> Bytes {
        [self.bytecode.as_ref(), self.encoded_args.as_ref()]
            .concat()
            .into()
    }
}
