// Authorization guard for privileged commands.
//
// A guard is an ordered list of checks. They run in order before the command
// body and the first denial wins, so a non-admin is told they are not an
// admin even if they are also blocked.

use super::access_models::{AccessError, Caller};
use super::access_service::AccessService;
use super::access_store::AccessStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardCheck {
    /// Caller must be an administrator.
    Administrator,
    /// Caller must not hold the `blocked` level.
    NotBlocked,
}

impl GuardCheck {
    fn denial_key(&self) -> &'static str {
        match self {
            GuardCheck::Administrator => "access_control.admin_only_command",
            GuardCheck::NotBlocked => "access_control.blocked_user",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Deny { message_key: &'static str },
}

pub struct AuthorizationGuard {
    checks: Vec<GuardCheck>,
}

impl AuthorizationGuard {
    pub fn new(checks: Vec<GuardCheck>) -> Self {
        Self { checks }
    }

    /// Guard used by grant, check and revoke.
    pub fn admin_commands() -> Self {
        Self::new(vec![GuardCheck::Administrator, GuardCheck::NotBlocked])
    }

    pub async fn evaluate<S: AccessStore>(
        &self,
        caller: &Caller,
        access: &AccessService<S>,
    ) -> Result<GuardDecision, AccessError> {
        for check in &self.checks {
            let denied = match check {
                GuardCheck::Administrator => !caller.is_admin,
                GuardCheck::NotBlocked => access.is_blocked(caller.user_id).await?,
            };

            if denied {
                return Ok(GuardDecision::Deny {
                    message_key: check.denial_key(),
                });
            }
        }

        Ok(GuardDecision::Allow)
    }
}
