//! Core services implementing the business logic.
//!
//! This module contains the main service implementations:
//! - `blockchain`: Chain client interfaces, JSON-RPC transport and contract reads
//! - `blockrate`: Blocks-per-day estimation and its cache file
//! - `checks`: The monitoring checks, their registry and record sinks
//! - `explorer`: Block explorer lookups
//! - `pubsub`: IPFS pub/sub subscriptions
//! - `scanner`: Lookback range resolution and paginated log scans

pub mod blockchain;
pub mod blockrate;
pub mod checks;
pub mod explorer;
pub mod pubsub;
pub mod scanner;
