use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// Shared map of lazily created clients, keyed by chain name.
#[derive(Default)]
pub struct ClientStorage<T> {
	pub clients: Arc<RwLock<HashMap<String, Arc<T>>>>,
}

impl<T> ClientStorage<T> {
	pub fn new() -> Self {
		Self {
			clients: Arc::new(RwLock::new(HashMap::new())),
		}
	}

	/// Returns the cached client for `key`, if any.
	pub async fn get(&self, key: &str) -> Option<Arc<T>> {
		self.clients.read().await.get(key).cloned()
	}

	pub async fn len(&self) -> usize {
		self.clients.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.clients.read().await.is_empty()
	}
}
