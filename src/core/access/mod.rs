// Core access-control module - grant, check and revoke of access levels.

pub mod access_models;
pub mod access_service;
pub mod access_store;
pub mod guard;
pub mod selection;

pub use access_models::*;
pub use access_service::AccessService;
pub use access_store::AccessStore;
pub use guard::{AuthorizationGuard, GuardDecision};
pub use selection::{PendingSelection, SelectionAction};
