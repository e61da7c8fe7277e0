//! Static pNetwork v3 identifiers.
//!
//! The protocol refers to chains by a 4-byte identifier and to actors by a small
//! integer type. Both tables are closed; anything outside them is reported as an
//! unknown identifier by the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// pNetwork chain identifiers and the chain name they map to.
pub const CHAIN_IDS: [(&str, &str); 3] = [
	("0x5aca268b", "bsc"),
	("0xb9286154", "goerli"),
	("0xf9b459a1", "polygon"),
];

/// Looks up the chain name for a pNetwork chain identifier (case-insensitive).
pub fn chain_name_for_id(chain_id: &str) -> Option<&'static str> {
	let chain_id = chain_id.trim();
	CHAIN_IDS
		.iter()
		.find(|(id, _)| id.eq_ignore_ascii_case(chain_id))
		.map(|(_, name)| *name)
}

/// Role of an actor registered in the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorType {
	Governance = 0,
	Guardian = 1,
	Sentinel = 2,
}

impl ActorType {
	/// All actor types in protocol order.
	pub const ALL: [ActorType; 3] = [Self::Governance, Self::Guardian, Self::Sentinel];

	pub fn as_u8(self) -> u8 {
		self as u8
	}

	pub fn from_u8(value: u8) -> Option<Self> {
		match value {
			0 => Some(Self::Governance),
			1 => Some(Self::Guardian),
			2 => Some(Self::Sentinel),
			_ => None,
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			Self::Governance => "governance",
			Self::Guardian => "guardian",
			Self::Sentinel => "sentinel",
		}
	}
}

impl fmt::Display for ActorType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// `OperationQueued` event topic
pub const OPERATION_QUEUED_TOPIC: &str =
	"0xe7bf22971bde3dd8a6a3bf8434e8b7a7c7554dad8328f741da1484d67b445c19";

/// `OperationCancelled` event topic
pub const OPERATION_CANCELLED_TOPIC: &str =
	"0x33fe909c76b8ce2d80c623608e768bdb2c69f1d53f55d56d0e562a6e9c567288";

/// `ActorsPropagated` event topic
pub const ACTORS_PROPAGATED_TOPIC: &str =
	"0x7d394dea630b3e42246f284e4e4b75cff4f959869b3d753639ba8ae6120c67c3";
