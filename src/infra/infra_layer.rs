// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "access/mod.rs"]
pub mod access;

#[path = "ai/mod.rs"]
pub mod ai;
