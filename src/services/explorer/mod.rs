//! Block explorer lookups.
//!
//! - Block number closest before a timestamp
//! - Native currency USD price

mod client;
mod error;

pub use client::{ExplorerClient, ExplorerClientTrait};
pub use error::ExplorerError;
