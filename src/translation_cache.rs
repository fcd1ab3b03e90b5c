//! Sentence translation cache keyed by the exact source text.
//!
//! Owned by the application state and shared by all requests. Entries live for the whole
//! process lifetime; there is no eviction.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct TranslationCache {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, text: &str) -> Option<String> {
        self.entries.read().await.get(text).cloned()
    }

    pub async fn insert(&self, text: impl Into<String>, translation: impl Into<String>) {
        self.entries.write().await.insert(text.into(), translation.into());
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_by_exact_text() {
        let cache = TranslationCache::new();
        assert!(cache.get("Bonjour").await.is_none());
        cache.insert("Bonjour", "Hello").await;
        assert_eq!(cache.get("Bonjour").await.as_deref(), Some("Hello"));
        assert!(cache.get("bonjour").await.is_none());

        // Clones share the same entries.
        let other = cache.clone();
        other.insert("Merci", "Thanks").await;
        assert_eq!(cache.len().await, 2);
    }
}
