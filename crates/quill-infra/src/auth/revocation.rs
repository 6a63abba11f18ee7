//! In-memory revocation set for logged-out tokens.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::ports::RevocationStore;

/// Revoked token strings held in process memory.
///
/// Unbounded and never pruned; everything is forgotten on restart.
pub struct InMemoryRevocationStore {
    revoked: RwLock<HashSet<String>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self {
            revoked: RwLock::new(HashSet::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.revoked.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.revoked.read().await.is_empty()
    }
}

impl Default for InMemoryRevocationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn revoke(&self, token: &str) {
        let mut revoked = self.revoked.write().await;
        revoked.insert(token.to_string());
    }

    async fn is_revoked(&self, token: &str) -> bool {
        self.revoked.read().await.contains(token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let store = InMemoryRevocationStore::new();

        store.revoke("t1").await;
        store.revoke("t1").await;

        assert!(store.is_revoked("t1").await);
        assert!(!store.is_revoked("t2").await);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_revocations() {
        let store = Arc::new(InMemoryRevocationStore::new());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.revoke(&format!("token-{}", i % 8)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len().await, 8);
    }
}
