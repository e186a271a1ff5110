//! Screen state holders and the navigation contract they are wired through.
//!
//! # Responsibility
//! - Hold reactive per-screen state derived from the notes use-case.
//! - Turn user intents into use-case calls and one-shot effects.
//! - Scope every spawned task to the owning state holder.
//!
//! # Invariants
//! - State holders must be created inside a Tokio runtime.
//! - Dropping a state holder aborts its in-flight work; late results are
//!   discarded.
//! - Storage failures are logged and swallowed; no error reaches the screen.

mod effects;
pub mod nav;
pub mod note_detail_view_model;
pub mod notes_view_model;
pub mod saved_state;
pub mod scope;

pub use effects::{EffectReceiver, EFFECTS_BUFFER};
