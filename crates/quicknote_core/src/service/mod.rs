//! Use-case layer.
//!
//! # Responsibility
//! - Give state holders one seam to depend on (and to fake in tests).
//! - Keep state holders decoupled from repository implementations.

pub mod notes_use_case;
