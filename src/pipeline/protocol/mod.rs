//! Heuristic parser for free-form protocol text.
//!
//! Lossy on purpose: anything that does not look like a phase, list item,
//! supplement line or coaching note is skipped. Never fails.

pub mod parser;
pub mod types;

pub use parser::parse_protocol;
pub use types::*;
