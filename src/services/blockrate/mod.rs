//! Blocks-per-day estimation.
//!
//! - Median-interval estimator over sampled block timestamps
//! - On-disk cache replaced atomically, expired by modification time

mod cache;
mod error;
mod estimator;

pub use cache::{BlockRateCache, CachedEstimates};
pub use error::BlockRateError;
pub use estimator::{blocks_per_day_from_samples, BlockRateEstimator, BlockRateEstimatorTrait};
