//! Monitoring checks.
//!
//! Each check composes contract reads, log scans or the pub/sub listener and writes
//! its records to an [`ObservationSink`]. Failures of one chain, log or message are
//! written as error-shaped records and never stop the remaining work.

mod balances;
mod cancelled;
mod check;
mod context;
mod epochs;
mod error;
mod hub;
mod id;
mod queued;
mod registry;
mod sink;
mod slashed;
mod sync_state;

pub use balances::{propagated_actors, Component, ComponentsBalancesCheck};
pub use cancelled::OperationCancelledCheck;
pub use check::{for_each_chain, ChainCheck, Check};
pub use context::MonitorContext;
pub use epochs::InactiveActorsCheck;
pub use error::CheckError;
pub use hub::HubQueryCheck;
pub use id::CheckId;
pub use queued::{QueuedOperation, QueuedOperationsCheck, OPERATION_TUPLE};
pub use registry::CheckRegistry;
pub use sink::{MemorySink, ObservationSink, StdoutSink};
pub use slashed::{slashed_actor, SlashedActorsCheck};
pub use sync_state::{sync_state_fields, PubSubCheck, SyncStateHandler};
