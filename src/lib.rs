//! pNetwork v3 bridge monitor.
//!
//! This library polls the bridge's contracts and events on several EVM chains and
//! listens to the protocol's IPFS pub/sub gossip, producing one structured record per
//! observation. It includes:
//!
//! - Configuration management through a JSON file
//! - Paginated event-log scans over a day window with a cached blocks-per-day estimate
//! - A cancellable pub/sub subscription listener
//! - The monitoring checks and their registry
//!
//! # Module Structure
//!
//! - `bootstrap`: Bootstraps the application
//! - `models`: Data structures for configuration, chain data and records
//! - `services`: Core business logic and chain interaction
//! - `utils`: Common utilities and helper functions

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
