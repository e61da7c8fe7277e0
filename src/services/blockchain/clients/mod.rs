//! Chain client implementations.
//!
//! - EVM client for every monitored chain

mod evm {
	pub mod client;
}

pub use evm::client::{EvmClient, EvmClientTrait};
