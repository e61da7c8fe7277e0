//! On-disk blocks-per-day cache.
//!
//! A flat JSON object `{"<chain>": <blocks per day>}`. The file's modification time
//! is the creation time of the estimates; every write replaces the whole file
//! through a temporary sibling and a rename.

use std::{
	collections::{BTreeMap, HashMap},
	io::ErrorKind as IoErrorKind,
	path::{Path, PathBuf},
	time::{Duration, SystemTime},
};

use crate::services::blockrate::BlockRateError;

/// Estimates read back from the cache file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedEstimates {
	pub estimates: BTreeMap<String, u64>,
	/// Modification time of the file
	pub written_at: SystemTime,
}

impl CachedEstimates {
	/// Age of the estimates; a timestamp in the future counts as brand new.
	pub fn age(&self) -> Duration {
		self.age_at(SystemTime::now())
	}

	fn age_at(&self, now: SystemTime) -> Duration {
		now.duration_since(self.written_at).unwrap_or(Duration::ZERO)
	}

	pub fn is_fresh(&self, validity: Duration) -> bool {
		self.is_fresh_at(validity, SystemTime::now())
	}

	/// Estimates exactly `validity` old are still fresh.
	fn is_fresh_at(&self, validity: Duration, now: SystemTime) -> bool {
		self.age_at(now) <= validity
	}
}

#[derive(Debug, Clone)]
pub struct BlockRateCache {
	path: PathBuf,
}

fn path_metadata(path: &Path) -> Option<HashMap<String, String>> {
	Some(HashMap::from([(
		"path".to_string(),
		path.display().to_string(),
	)]))
}

impl BlockRateCache {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// Reads the cache. A missing file is `Ok(None)`.
	pub async fn load(&self) -> Result<Option<CachedEstimates>, BlockRateError> {
		let metadata = match tokio::fs::metadata(&self.path).await {
			Ok(metadata) => metadata,
			Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(None),
			Err(e) => {
				return Err(BlockRateError::cache_error(
					"failed to stat blocks-per-day cache",
					Some(Box::new(e)),
					path_metadata(&self.path),
				))
			}
		};
		let written_at = metadata.modified().map_err(|e| {
			BlockRateError::cache_error(
				"cache modification time unavailable",
				Some(Box::new(e)),
				path_metadata(&self.path),
			)
		})?;

		let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
			BlockRateError::cache_error(
				"failed to read blocks-per-day cache",
				Some(Box::new(e)),
				path_metadata(&self.path),
			)
		})?;
		let estimates: BTreeMap<String, u64> = serde_json::from_str(&content).map_err(|e| {
			BlockRateError::cache_error(
				"blocks-per-day cache is not a chain to integer map",
				Some(Box::new(e)),
				path_metadata(&self.path),
			)
		})?;

		Ok(Some(CachedEstimates {
			estimates,
			written_at,
		}))
	}

	/// Replaces the cache contents atomically.
	pub async fn store(&self, estimates: &BTreeMap<String, u64>) -> Result<(), BlockRateError> {
		let content = serde_json::to_string(estimates).map_err(|e| {
			BlockRateError::cache_error(
				"failed to serialize estimates",
				Some(Box::new(e)),
				path_metadata(&self.path),
			)
		})?;

		let mut temp_name = self.path.as_os_str().to_owned();
		temp_name.push(".tmp");
		let temp_path = PathBuf::from(temp_name);

		tokio::fs::write(&temp_path, content).await.map_err(|e| {
			BlockRateError::cache_error(
				"failed to write blocks-per-day cache",
				Some(Box::new(e)),
				path_metadata(&temp_path),
			)
		})?;
		tokio::fs::rename(&temp_path, &self.path).await.map_err(|e| {
			BlockRateError::cache_error(
				"failed to replace blocks-per-day cache",
				Some(Box::new(e)),
				path_metadata(&self.path),
			)
		})?;

		tracing::debug!(path = %self.path.display(), chains = estimates.len(), "blocks-per-day cache written");
		Ok(())
	}
}
