pub mod codefix_service;

pub use codefix_service::{CodeFixService, FixOutcome, DEFAULT_FIX_SYSTEM_PROMPT};
