/*! Core types for framepick.

Regenerate TypeScript types: `cargo test -p framepick export_bindings`
*/

#![allow(missing_docs)]

mod error;
mod event;
mod selected;

pub use error::{BridgeError, FramepickError, FramepickResult};
pub use event::BridgeEvent;
pub use selected::{Attributes, SelectedElement};
