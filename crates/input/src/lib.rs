//! Input: held-key map, action bindings, pointer capture.
//!
//! # Invariants
//! - At most one key-state entry per distinct (lowercased) key.
//! - The key-state map never shrinks; releasing a key sets it to false.
//! - Pointer capture changes only through an explicit toggle.

pub mod action;
mod keys;
mod pointer;

pub use action::{Action, KeyBindings};
pub use keys::KeyState;
pub use pointer::{HeadlessPointer, PointerError, PointerSurface, toggle_pointer_lock};
