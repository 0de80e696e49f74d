// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "access/mod.rs"]
pub mod access;

#[path = "ai/mod.rs"]
pub mod ai;

#[path = "codefix/mod.rs"]
pub mod codefix;

#[path = "text/mod.rs"]
pub mod text;
