//! Helpers shared by the services.
//!
//! - `client_storage`: per-chain cache of lazily built clients
//! - `http`: base and retrying HTTP clients, retry settings
//! - `logging`: tracing setup and the error context
//! - `macros`: case-insensitive tagged enum deserialization
//! - `parsing`: JSON-RPC hex quantities, unit scaling and CLI sizes
//! - `tests`: builders and clients for tests

pub mod client_storage;
pub mod http;
pub mod logging;
pub mod macros;
pub mod parsing;

pub use client_storage::ClientStorage;
pub use http::*;
pub use parsing::*;
