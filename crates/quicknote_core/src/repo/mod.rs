//! Repository layer: domain-shaped access to the note store.
//!
//! # Responsibility
//! - Map store rows to domain notes and back.
//! - Keep the store contract out of use-case and state holder signatures.

pub mod mapper;
pub mod note_repo;
