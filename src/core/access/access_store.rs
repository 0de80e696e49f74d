use super::access_models::{AccessError, AccessLevel};
use async_trait::async_trait;
use std::collections::HashSet;

/// Persistence port for access grants.
///
/// Implementations must make `grant` a no-op for an already held level and
/// `revoke` a no-op for a level the user does not hold.
#[async_trait]
pub trait AccessStore: Send + Sync {
    async fn grant(&self, user_id: u64, level: AccessLevel) -> Result<(), AccessError>;

    async fn revoke(&self, user_id: u64, level: AccessLevel) -> Result<(), AccessError>;

    /// All users currently holding `level`.
    async fn list_user_ids(&self, level: AccessLevel) -> Result<HashSet<u64>, AccessError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use dashmap::DashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// In-memory store for testing
    #[derive(Default)]
    pub struct MockAccessStore {
        pub grants: DashMap<AccessLevel, HashSet<u64>>,
        pub writes: AtomicUsize,
        pub fail: AtomicBool,
    }

    impl MockAccessStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_grants(grants: &[(u64, AccessLevel)]) -> Self {
            let store = Self::new();
            for (user_id, level) in grants {
                store.grants.entry(*level).or_default().insert(*user_id);
            }
            store
        }

        pub fn holders(&self, level: AccessLevel) -> HashSet<u64> {
            self.grants
                .get(&level)
                .map(|set| set.clone())
                .unwrap_or_default()
        }

        fn check_failure(&self) -> Result<(), AccessError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(AccessError::StorageError("database is locked".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl AccessStore for MockAccessStore {
        async fn grant(&self, user_id: u64, level: AccessLevel) -> Result<(), AccessError> {
            self.check_failure()?;
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.grants.entry(level).or_default().insert(user_id);
            Ok(())
        }

        async fn revoke(&self, user_id: u64, level: AccessLevel) -> Result<(), AccessError> {
            self.check_failure()?;
            self.writes.fetch_add(1, Ordering::SeqCst);
            if let Some(mut set) = self.grants.get_mut(&level) {
                set.remove(&user_id);
            }
            Ok(())
        }

        async fn list_user_ids(&self, level: AccessLevel) -> Result<HashSet<u64>, AccessError> {
            self.check_failure()?;
            Ok(self.holders(level))
        }
    }
}
