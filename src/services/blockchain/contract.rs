//! Read-only contract calls.
//!
//! Calls are described by their Solidity signature and output types; the selector is
//! the first four bytes of `keccak256(signature)` and arguments and results go through
//! the dynamic ABI codec.

use alloy::{
	dyn_abi::{DynSolType, DynSolValue},
	primitives::{keccak256, Address, Bytes, U256},
};

use crate::services::blockchain::{BlockChainError, EvmClientTrait};

/// A view function: signature plus the tuple of its return types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractCall {
	pub signature: &'static str,
	pub outputs: &'static str,
}

impl ContractCall {
	pub const fn new(signature: &'static str, outputs: &'static str) -> Self {
		Self { signature, outputs }
	}

	pub fn selector(&self) -> [u8; 4] {
		let hash = keccak256(self.signature.as_bytes());
		[hash[0], hash[1], hash[2], hash[3]]
	}

	/// Selector followed by the ABI-encoded arguments
	pub fn encode(&self, args: Vec<DynSolValue>) -> Bytes {
		let mut data = self.selector().to_vec();
		if !args.is_empty() {
			data.extend(DynSolValue::Tuple(args).abi_encode_params());
		}
		Bytes::from(data)
	}

	/// Decodes return data into one value per output type
	pub fn decode(&self, data: &[u8]) -> Result<Vec<DynSolValue>, BlockChainError> {
		decode_params(self.outputs, data)
			.map_err(|e| BlockChainError::decode_error(format!("{}: {}", self.signature, e), None, None))
	}
}

/// Decodes ABI-encoded `data` against a tuple type such as `(uint256,address)`.
pub fn decode_params(types: &str, data: &[u8]) -> Result<Vec<DynSolValue>, String> {
	let ty = DynSolType::parse(types).map_err(|e| format!("invalid type '{}': {}", types, e))?;
	match ty.abi_decode_params(data).map_err(|e| e.to_string())? {
		DynSolValue::Tuple(values) => Ok(values),
		other => Ok(vec![other]),
	}
}

/// Factory, hub and DAO view functions read by the checks
pub mod calls {
	use super::ContractCall;

	pub const HUB: ContractCall = ContractCall::new("hub()", "(address)");
	pub const NUMBER_OF_OPERATIONS_IN_QUEUE: ContractCall =
		ContractCall::new("numberOfOperationsInQueue()", "(uint256)");
	pub const MAX_OPERATIONS_IN_QUEUE: ContractCall =
		ContractCall::new("maxOperationsInQueue()", "(uint256)");
	pub const CURRENT_CHALLENGE_PERIOD_DURATION: ContractCall =
		ContractCall::new("getCurrentChallengePeriodDuration()", "(uint64)");
	pub const SLASHER: ContractCall = ContractCall::new("slasher()", "(address)");
	pub const REGISTRATION_MANAGER: ContractCall =
		ContractCall::new("registrationManager()", "(address)");
	pub const GOVERNANCE_MESSAGE_EMITTER: ContractCall =
		ContractCall::new("governanceMessageEmitter()", "(address)");
	pub const EPOCHS_MANAGER: ContractCall = ContractCall::new("epochsManager()", "(address)");
	pub const CURRENT_EPOCH: ContractCall = ContractCall::new("currentEpoch()", "(uint16)");
	pub const TOTAL_ACTORS_BY_EPOCH_AND_TYPE: ContractCall = ContractCall::new(
		"getTotalNumberOfActorsByEpochAndType(uint16,uint8)",
		"(uint16)",
	);
	pub const TOTAL_INACTIVE_ACTORS_BY_EPOCH_AND_TYPE: ContractCall = ContractCall::new(
		"getTotalNumberOfInactiveActorsByEpochAndType(uint16,uint8)",
		"(uint16)",
	);
}

/// Typed wrappers over [`EvmClientTrait::call`]
pub struct ContractReader<'a, C> {
	client: &'a C,
}

impl<'a, C: EvmClientTrait + Sync> ContractReader<'a, C> {
	pub fn new(client: &'a C) -> Self {
		Self { client }
	}

	pub async fn read(
		&self,
		address: &str,
		call: &ContractCall,
		args: Vec<DynSolValue>,
	) -> Result<Vec<DynSolValue>, anyhow::Error> {
		let output = self.client.call(address, call.encode(args)).await?;
		Ok(call.decode(&output)?)
	}

	/// Reads a call returning a single address
	pub async fn read_address(
		&self,
		address: &str,
		call: &ContractCall,
	) -> Result<Address, anyhow::Error> {
		let values = self.read(address, call, Vec::new()).await?;
		match values.first() {
			Some(DynSolValue::Address(value)) => Ok(*value),
			_ => Err(unexpected_output(call)),
		}
	}

	/// Reads a call returning a single unsigned integer
	pub async fn read_uint(
		&self,
		address: &str,
		call: &ContractCall,
		args: Vec<DynSolValue>,
	) -> Result<U256, anyhow::Error> {
		let values = self.read(address, call, args).await?;
		match values.first() {
			Some(DynSolValue::Uint(value, _)) => Ok(*value),
			_ => Err(unexpected_output(call)),
		}
	}
}

fn unexpected_output(call: &ContractCall) -> anyhow::Error {
	BlockChainError::decode_error(
		format!("{} did not return {}", call.signature, call.outputs),
		None,
		None,
	)
	.into()
}
