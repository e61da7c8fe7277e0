//! Event log scanning over day windows.
//!
//! - Block range resolution from a blocks-per-day estimate or explorer lookups
//! - Fixed-stride window planning capped at the provider's span limit
//! - Throttled, paginated `eth_getLogs` scanning

mod error;
mod resolver;
mod scanner;
mod window;

pub use error::ScanError;
pub use resolver::{start_of_day_utc, BlockRangeResolver};
pub use scanner::{LogScanner, LogScannerTrait};
pub use window::{ScanWindow, WindowPlan};
