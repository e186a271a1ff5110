//! Domain model for notes.
//!
//! # Responsibility
//! - Define the note shape used by repository, use-case and state holders.
//! - Keep storage row details out of domain signatures.
//!
//! # Invariants
//! - A persisted note always has `id > 0`; `0` marks a note not saved yet.

pub mod display;
pub mod note;
