// Access-level service - reads and writes grants through an `AccessStore`.
//
// Nothing here is cached: every call goes back to the store so commands
// always act on the current state.

use super::access_models::{AccessError, AccessLevel, AccessStatus};
use super::access_store::AccessStore;

pub struct AccessService<S: AccessStore> {
    store: S,
}

impl<S: AccessStore> AccessService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn grant(&self, user_id: u64, level: AccessLevel) -> Result<(), AccessError> {
        self.store.grant(user_id, level).await
    }

    /// Revoke `level` only if the user currently holds it.
    ///
    /// Returns `false` without touching the store when the user does not hold
    /// the level.
    pub async fn revoke_if_held(&self, user_id: u64, level: AccessLevel) -> Result<bool, AccessError> {
        if !self.holds(user_id, level).await? {
            return Ok(false);
        }

        self.store.revoke(user_id, level).await?;
        Ok(true)
    }

    pub async fn holds(&self, user_id: u64, level: AccessLevel) -> Result<bool, AccessError> {
        let holders = self.store.list_user_ids(level).await?;
        Ok(holders.contains(&user_id))
    }

    pub async fn is_blocked(&self, user_id: u64) -> Result<bool, AccessError> {
        self.holds(user_id, AccessLevel::Blocked).await
    }

    /// Combined status of a user. Reads the advanced and blocked holders
    /// separately.
    pub async fn check(&self, user_id: u64) -> Result<AccessStatus, AccessError> {
        let advanced = self.store.list_user_ids(AccessLevel::Advanced).await?;
        let blocked = self.store.list_user_ids(AccessLevel::Blocked).await?;

        Ok(AccessStatus::from_membership(
            advanced.contains(&user_id),
            blocked.contains(&user_id),
        ))
    }
}
