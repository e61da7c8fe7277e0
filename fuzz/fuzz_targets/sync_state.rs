#![no_main]

use libfuzzer_sys::fuzz_target;
use pnetwork_monitor::{models::PubSubMessage, services::checks::sync_state_fields};

fuzz_target!(|data: &[u8]| {
    let message = PubSubMessage {
        payload: data.to_vec(),
        sender: "fuzz".to_string(),
    };
    let _ = sync_state_fields(&message);
});
