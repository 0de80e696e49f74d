// Access-control domain models.
//
// Pure domain types with no Discord dependencies. The Discord layer turns
// interactions into a `CommandContext` and outcomes back into messages.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A privilege tag a user may hold. Levels are independent of each other:
/// a user can hold none, one, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessLevel {
    Advanced,
    Blocked,
}

impl AccessLevel {
    /// Every level, in the order they are offered in the selector.
    pub const ALL: [AccessLevel; 2] = [AccessLevel::Advanced, AccessLevel::Blocked];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Advanced => "advanced",
            AccessLevel::Blocked => "blocked",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "advanced" => Ok(AccessLevel::Advanced),
            "blocked" => Ok(AccessLevel::Blocked),
            other => Err(AccessError::UnknownLevel(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Unknown access level: {0}")]
    UnknownLevel(String),
}

/// The user invoking a command, as seen by the authorization guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: u64,
    /// Holds the ADMINISTRATOR permission or is a configured bot admin.
    pub is_admin: bool,
}

/// Everything the access commands need to know about one invocation.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub caller: Caller,
    /// `None` when the command was used outside a guild (e.g. in DMs).
    pub guild_id: Option<u64>,
    pub target_user_id: u64,
    /// Whether the target resolved as a member of `guild_id`.
    pub target_in_guild: bool,
}

/// Why an access command refused to run for its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("command used outside of a guild")]
    GuildOnly,
    #[error("target user is not a member of the guild")]
    NotInGuild,
}

impl ContextError {
    pub fn message_key(&self) -> &'static str {
        match self {
            ContextError::GuildOnly => "access_control.guild_only_command",
            ContextError::NotInGuild => "access_control.user_not_in_guild",
        }
    }
}

/// Resolve the target of an access command.
///
/// Guild scope is checked first, so a command run in DMs always fails with
/// `GuildOnly` no matter who the target is.
pub fn validate_context(ctx: &CommandContext) -> Result<u64, ContextError> {
    if ctx.guild_id.is_none() {
        return Err(ContextError::GuildOnly);
    }
    if !ctx.target_in_guild {
        return Err(ContextError::NotInGuild);
    }
    Ok(ctx.target_user_id)
}

/// Combined view of which levels a user holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStatus {
    AdvancedAndBlocked,
    Advanced,
    Blocked,
    NoAccessLevel,
}

impl AccessStatus {
    /// Combined status is decided first so a user holding both levels never
    /// reports as only one of them.
    pub fn from_membership(advanced: bool, blocked: bool) -> Self {
        match (advanced, blocked) {
            (true, true) => AccessStatus::AdvancedAndBlocked,
            (true, false) => AccessStatus::Advanced,
            (false, true) => AccessStatus::Blocked,
            (false, false) => AccessStatus::NoAccessLevel,
        }
    }

    pub fn message_key(&self) -> &'static str {
        match self {
            AccessStatus::AdvancedAndBlocked => "access_control.user_has_advanced_and_blocked",
            AccessStatus::Advanced => "access_control.user_has_advanced",
            AccessStatus::Blocked => "access_control.user_has_blocked",
            AccessStatus::NoAccessLevel => "access_control.user_has_no_access_level",
        }
    }
}
