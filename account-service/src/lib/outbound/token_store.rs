use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use auth::TokenKind;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::account::errors::TokenStoreError;
use crate::account::models::UserId;
use crate::account::ports::TokenStore;

#[derive(Debug, Clone)]
struct StoredToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// In-process token registry with per-entry TTL.
///
/// One slot per (user, kind); writes overwrite, reads past the deadline
/// behave as absent and drop the entry. The `TokenStore` port is the seam
/// where a networked key-value store would replace this.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenStore {
    entries: Arc<RwLock<HashMap<(Uuid, TokenKind), StoredToken>>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn put(
        &self,
        user_id: &UserId,
        kind: TokenKind,
        token: &str,
        ttl: Duration,
    ) -> Result<(), TokenStoreError> {
        let entry = StoredToken {
            token: token.to_string(),
            expires_at: Utc::now() + ttl,
        };

        self.entries.write().await.insert((user_id.0, kind), entry);
        Ok(())
    }

    async fn get(
        &self,
        user_id: &UserId,
        kind: TokenKind,
    ) -> Result<Option<String>, TokenStoreError> {
        let key = (user_id.0, kind);

        {
            let entries = self.entries.read().await;
            match entries.get(&key) {
                Some(entry) if Utc::now() < entry.expires_at => {
                    return Ok(Some(entry.token.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // The entry looked lapsed under the read lock, but a put may have
        // replaced it before we got the write lock; purge only if it is
        // still past its deadline.
        let mut entries = self.entries.write().await;
        match entries.get(&key) {
            Some(entry) if Utc::now() < entry.expires_at => Ok(Some(entry.token.clone())),
            Some(_) => {
                entries.remove(&key);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_absent_until_put() {
        let store = InMemoryTokenStore::new();
        let user_id = UserId::new();

        assert_eq!(store.get(&user_id, TokenKind::Access).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_kinds_are_independent_slots() {
        let store = InMemoryTokenStore::new();
        let user_id = UserId::new();

        store
            .put(&user_id, TokenKind::Access, "Bearer a", Duration::minutes(60))
            .await
            .unwrap();
        store
            .put(&user_id, TokenKind::Refresh, "Bearer r", Duration::hours(24))
            .await
            .unwrap();

        assert_eq!(
            store.get(&user_id, TokenKind::Access).await.unwrap(),
            Some("Bearer a".to_string())
        );
        assert_eq!(
            store.get(&user_id, TokenKind::Refresh).await.unwrap(),
            Some("Bearer r".to_string())
        );
    }

    #[tokio::test]
    async fn test_put_overwrites_previous_token() {
        let store = InMemoryTokenStore::new();
        let user_id = UserId::new();

        store
            .put(&user_id, TokenKind::Access, "Bearer old", Duration::minutes(60))
            .await
            .unwrap();
        store
            .put(&user_id, TokenKind::Access, "Bearer new", Duration::minutes(60))
            .await
            .unwrap();

        // Last writer wins; the old value is gone, not shadowed
        assert_eq!(
            store.get(&user_id, TokenKind::Access).await.unwrap(),
            Some("Bearer new".to_string())
        );
    }

    #[tokio::test]
    async fn test_entries_lapse_after_ttl() {
        let store = InMemoryTokenStore::new();
        let user_id = UserId::new();

        store
            .put(&user_id, TokenKind::Access, "Bearer a", Duration::seconds(-1))
            .await
            .unwrap();

        assert_eq!(store.get(&user_id, TokenKind::Access).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_fresh_put_survives_racing_lapsed_get() {
        let store = InMemoryTokenStore::new();
        let user_id = UserId::new();

        // A get observing a lapsed entry races a re-login's put; the purge
        // must never take out the freshly registered token.
        for _ in 0..1_000 {
            store
                .put(&user_id, TokenKind::Access, "Bearer stale", Duration::seconds(-1))
                .await
                .unwrap();

            let getter = {
                let store = store.clone();
                tokio::spawn(async move { store.get(&user_id, TokenKind::Access).await })
            };
            let putter = {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .put(&user_id, TokenKind::Access, "Bearer fresh", Duration::minutes(60))
                        .await
                })
            };
            getter.await.unwrap().unwrap();
            putter.await.unwrap().unwrap();

            assert_eq!(
                store.get(&user_id, TokenKind::Access).await.unwrap(),
                Some("Bearer fresh".to_string())
            );
        }
    }

    #[tokio::test]
    async fn test_users_do_not_share_slots() {
        let store = InMemoryTokenStore::new();
        let alice = UserId::new();
        let bob = UserId::new();

        store
            .put(&alice, TokenKind::Access, "Bearer a", Duration::minutes(60))
            .await
            .unwrap();

        assert_eq!(store.get(&bob, TokenKind::Access).await.unwrap(), None);
    }
}
