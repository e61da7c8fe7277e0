#![no_main]

use libfuzzer_sys::fuzz_target;
use pnetwork_monitor::services::pubsub::decode_envelope;

fuzz_target!(|data: &[u8]| {
    let _ = decode_envelope(data);
});
