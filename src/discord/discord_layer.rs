// Discord layer - commands and the types shared by them.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "replies.rs"]
pub mod replies;

use crate::core::access::{AccessService, AuthorizationGuard};
use crate::core::codefix::CodeFixService;
use crate::core::text::TextCatalog;
use crate::infra::access::SqliteAccessStore;
use crate::infra::ai::AnthropicClient;
use std::collections::HashSet;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Services shared by every command. Built once in main.
pub struct Data {
    pub access: Arc<AccessService<SqliteAccessStore>>,
    pub guard: Arc<AuthorizationGuard>,
    pub codefix: Arc<CodeFixService<AnthropicClient>>,
    pub texts: Arc<TextCatalog>,
    pub admin_user_ids: Arc<HashSet<u64>>,
}
