#![no_main]

use libfuzzer_sys::fuzz_target;
use pnetwork_monitor::services::checks::QueuedOperation;

fuzz_target!(|data: &[u8]| {
    let _ = QueuedOperation::decode(data);
});
