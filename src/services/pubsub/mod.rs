//! IPFS pub/sub subscriptions.
//!
//! - Streaming HTTP transport and line splitting
//! - Envelope and multibase decoding
//! - Per-topic registry with at most one receive loop per topic
//! - Listener with unbounded and timed run policies

mod codec;
mod error;
mod listener;
mod registry;
mod transport;

pub use codec::{decode_envelope, decode_multibase, encode_topic};
pub use error::PubSubError;
pub use listener::{ExitHook, ListenTimeout, MessageHandler, SubscriptionListener};
pub use registry::{SubscriptionRegistry, SubscriptionState};
pub use transport::{split_lines, IpfsPubSubTransport, LineStream, PubSubTransport};
