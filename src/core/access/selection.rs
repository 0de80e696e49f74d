// Two-phase grant/revoke flow.
//
// A command first presents a `PendingSelection` (the user sees a selector with
// every access level), then the user's single choice resolves it. Resolving
// consumes the selection, so one selector can only ever apply one action.

use super::access_models::{AccessError, AccessLevel, CommandContext};
use super::access_service::AccessService;
use super::access_store::AccessStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionAction {
    Grant,
    Revoke,
}

impl SelectionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionAction::Grant => "grant",
            SelectionAction::Revoke => "revoke",
        }
    }

    /// Catalog key of the message shown above the selector.
    pub fn prompt_key(&self) -> &'static str {
        match self {
            SelectionAction::Grant => "access_control.grant_access_level_message",
            SelectionAction::Revoke => "access_control.revoke_access_level_message",
        }
    }
}

/// A selector that has been shown and is waiting for the user's choice.
#[derive(Debug)]
pub struct PendingSelection {
    action: SelectionAction,
    target_user_id: u64,
    requested_by: u64,
}

/// Terminal state of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    Granted { user_id: u64, level: AccessLevel },
    Revoked { user_id: u64, level: AccessLevel },
    /// Revoke was requested for a level the user does not hold.
    NotHeld { user_id: u64, level: AccessLevel },
}

impl SelectionOutcome {
    pub fn message_key(&self) -> &'static str {
        match self {
            SelectionOutcome::Granted { .. } => "access_control.access_level_granted",
            SelectionOutcome::Revoked { .. } => "access_control.access_level_revoked",
            SelectionOutcome::NotHeld { .. } => "access_control.user_does_not_have_access_level",
        }
    }

    pub fn user_id(&self) -> u64 {
        match self {
            SelectionOutcome::Granted { user_id, .. }
            | SelectionOutcome::Revoked { user_id, .. }
            | SelectionOutcome::NotHeld { user_id, .. } => *user_id,
        }
    }

    pub fn level(&self) -> AccessLevel {
        match self {
            SelectionOutcome::Granted { level, .. }
            | SelectionOutcome::Revoked { level, .. }
            | SelectionOutcome::NotHeld { level, .. } => *level,
        }
    }
}

impl PendingSelection {
    /// Start a selection for an already validated target.
    pub fn present(action: SelectionAction, ctx: &CommandContext, target_user_id: u64) -> Self {
        Self {
            action,
            target_user_id,
            requested_by: ctx.caller.user_id,
        }
    }

    pub fn action(&self) -> SelectionAction {
        self.action
    }

    /// Levels offered to the user; exactly one must be picked.
    pub fn options(&self) -> &'static [AccessLevel] {
        &AccessLevel::ALL
    }

    /// Apply the user's choice.
    ///
    /// `choice` is the raw value from the selector. Revoke re-reads the
    /// holders of the chosen level and leaves the store alone when the target
    /// is not among them.
    pub async fn resolve<S: AccessStore>(
        self,
        choice: &str,
        access: &AccessService<S>,
    ) -> Result<SelectionOutcome, AccessError> {
        let level: AccessLevel = choice.parse()?;
        let user_id = self.target_user_id;

        let outcome = match self.action {
            SelectionAction::Grant => {
                access.grant(user_id, level).await?;
                tracing::info!(
                    user_id,
                    level = %level,
                    requested_by = self.requested_by,
                    "Access level granted"
                );
                SelectionOutcome::Granted { user_id, level }
            }
            SelectionAction::Revoke => {
                if access.revoke_if_held(user_id, level).await? {
                    tracing::info!(
                        user_id,
                        level = %level,
                        requested_by = self.requested_by,
                        "Access level revoked"
                    );
                    SelectionOutcome::Revoked { user_id, level }
                } else {
                    tracing::info!(
                        user_id,
                        level = %level,
                        requested_by = self.requested_by,
                        "Attempted to revoke an access level the user does not have"
                    );
                    SelectionOutcome::NotHeld { user_id, level }
                }
            }
        };

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::access::access_models::Caller;
    use crate::core::access::access_store::mock::MockAccessStore;
    use std::sync::atomic::Ordering;

    fn context(target_user_id: u64) -> CommandContext {
        CommandContext {
            caller: Caller {
                user_id: 1,
                is_admin: true,
            },
            guild_id: Some(100),
            target_user_id,
            target_in_guild: true,
        }
    }

    #[tokio::test]
    async fn test_grant_selection_always_grants() {
        let access = AccessService::new(MockAccessStore::new());
        let selection = PendingSelection::present(SelectionAction::Grant, &context(42), 42);

        assert_eq!(selection.options(), &[AccessLevel::Advanced, AccessLevel::Blocked]);

        let outcome = selection.resolve("advanced", &access).await.unwrap();
        assert_eq!(
            outcome,
            SelectionOutcome::Granted {
                user_id: 42,
                level: AccessLevel::Advanced
            }
        );
        assert!(access.holds(42, AccessLevel::Advanced).await.unwrap());
    }

    #[tokio::test]
    async fn test_revoke_unheld_level_leaves_store_untouched() {
        let access = AccessService::new(MockAccessStore::new());
        let selection = PendingSelection::present(SelectionAction::Revoke, &context(42), 42);

        let outcome = selection.resolve("blocked", &access).await.unwrap();

        assert_eq!(
            outcome,
            SelectionOutcome::NotHeld {
                user_id: 42,
                level: AccessLevel::Blocked
            }
        );
        assert_eq!(
            outcome.message_key(),
            "access_control.user_does_not_have_access_level"
        );
        assert_eq!(
            access.check(42).await.unwrap(),
            crate::core::access::AccessStatus::NoAccessLevel
        );
    }

    #[tokio::test]
    async fn test_revoke_held_level() {
        let store = MockAccessStore::with_grants(&[
            (42, AccessLevel::Advanced),
            (42, AccessLevel::Blocked),
        ]);
        let access = AccessService::new(store);
        let selection = PendingSelection::present(SelectionAction::Revoke, &context(42), 42);

        let outcome = selection.resolve("blocked", &access).await.unwrap();

        assert!(matches!(outcome, SelectionOutcome::Revoked { .. }));
        assert!(!access.is_blocked(42).await.unwrap());
        // The other level is untouched
        assert!(access.holds(42, AccessLevel::Advanced).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_choice_is_rejected_without_writes() {
        let store = MockAccessStore::new();
        let access = AccessService::new(store);
        let selection = PendingSelection::present(SelectionAction::Grant, &context(42), 42);

        let result = selection.resolve("owner", &access).await;
        assert!(matches!(result, Err(AccessError::UnknownLevel(_))));
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_error() {
        let store = MockAccessStore::new();
        store.fail.store(true, Ordering::SeqCst);
        let access = AccessService::new(store);
        let selection = PendingSelection::present(SelectionAction::Revoke, &context(42), 42);

        assert!(selection.resolve("advanced", &access).await.is_err());
    }
}
