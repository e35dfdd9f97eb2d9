pub mod alloy;

pub type AlloyProvider = ::alloy::providers::DynProvider;

pub use self::alloy::provider;
