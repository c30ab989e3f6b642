//! Explicit query cache with entity-keyed invalidation
//!
//! Cached GET responses live under an explicit `(EntityKind, id)` key that
//! mutation handlers invalidate. The store is injected through `AppState`,
//! never ambient. Derived views (benchmark scores, progress) are recomputed
//! per request and never cached.

use scout_common::events::EntityKind;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Cache key: entity type plus owning id. List-style entries that have no
/// natural owner (the feed) use the nil UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: EntityKind,
    pub id: Uuid,
}

/// Shared response cache. Cloning shares the underlying store.
#[derive(Clone, Default)]
pub struct QueryCache {
    inner: Arc<RwLock<HashMap<CacheKey, Value>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached response for a key, if present
    pub async fn get(&self, kind: EntityKind, id: Uuid) -> Option<Value> {
        self.inner.read().await.get(&CacheKey { kind, id }).cloned()
    }

    /// Store a response under a key, replacing any previous entry
    pub async fn put(&self, kind: EntityKind, id: Uuid, value: Value) {
        self.inner.write().await.insert(CacheKey { kind, id }, value);
    }

    /// Drop a cached entry. Returns whether an entry existed.
    pub async fn invalidate(&self, kind: EntityKind, id: Uuid) -> bool {
        self.inner.write().await.remove(&CacheKey { kind, id }).is_some()
    }

    /// Number of live entries (used by tests)
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_get_invalidate() {
        let cache = QueryCache::new();
        let id = Uuid::new_v4();

        assert!(cache.get(EntityKind::Metrics, id).await.is_none());

        cache.put(EntityKind::Metrics, id, json!([1, 2, 3])).await;
        assert_eq!(cache.get(EntityKind::Metrics, id).await, Some(json!([1, 2, 3])));

        assert!(cache.invalidate(EntityKind::Metrics, id).await);
        assert!(cache.get(EntityKind::Metrics, id).await.is_none());
        assert!(!cache.invalidate(EntityKind::Metrics, id).await);
    }

    #[tokio::test]
    async fn test_keys_are_scoped_by_entity_kind() {
        let cache = QueryCache::new();
        let id = Uuid::new_v4();

        cache.put(EntityKind::Metrics, id, json!("metrics")).await;
        cache.put(EntityKind::Checklist, id, json!("checklist")).await;

        cache.invalidate(EntityKind::Metrics, id).await;
        assert!(cache.get(EntityKind::Metrics, id).await.is_none());
        assert_eq!(cache.get(EntityKind::Checklist, id).await, Some(json!("checklist")));
    }
}
