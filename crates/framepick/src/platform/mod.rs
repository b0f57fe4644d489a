/*!
Platform layer.

`traits.rs` is the contract; each platform implements `Dom` for its own
frame, document and element handles.

- `web` - browser DOM through `web-sys` (wasm32 only)
- `headless` - in-memory DOM for native hosts and tests
*/

pub mod headless;
mod traits;
#[cfg(target_arch = "wasm32")]
mod web;

pub use traits::{DocumentAccess, Disposition, Dom, ElementHandle, EventSink};
#[cfg(target_arch = "wasm32")]
pub use web::{WebDom, WebListeners};
