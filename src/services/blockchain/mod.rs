//! Chain access.
//!
//! - Client traits for block-level and contract-level reads
//! - EVM client over a JSON-RPC transport with endpoint rotation
//! - Read-only contract calls through the dynamic ABI codec
//! - Client pool caching one client per chain
//! - Error handling for chain operations

mod client;
mod clients;
mod contract;
mod error;
mod pool;
mod transports;

pub use client::BlockChainClient;
pub use clients::{EvmClient, EvmClientTrait};
pub use contract::{calls, decode_params, ContractCall, ContractReader};
pub use error::{error_kind_of, BlockChainError};
pub use pool::{ClientPool, ClientPoolTrait};
pub use transports::{
	rotates_on, rpc_request, BlockchainTransport, EndpointManager, HttpTransportClient,
	RotatingTransport, TransientErrorRetryStrategy, TransportError,
};
