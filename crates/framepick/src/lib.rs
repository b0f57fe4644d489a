/*!
Framepick - point-and-pick element selection for embedded frames

```ignore
use framepick::{Bridge, BridgeError, WebDom};

// Selection callback gets a descriptor, or None when the selection clears
let bridge = Bridge::<WebDom>::new(|selection| match selection {
    Some(element) => show_inspector(&element.path, &element.attributes),
    None => hide_inspector(),
});

// Bind the preview iframe, then start picking
bridge.set_frame(Some(iframe));
if !bridge.enable() {
    match bridge.last_error() {
        BridgeError::NotReady => retry_on_load(),
        BridgeError::CrossOrigin => show_unavailable(),
        _ => {}
    }
}

// Subscribe to hover/selection/status events
let mut events = bridge.subscribe();
while let Ok(event) = events.recv().await {
    // handle event
}

// Listeners detach and markers are removed
bridge.destroy();
```

The bridge is generic over a [`Dom`] platform: `WebDom` on `wasm32`, and the
in-memory [`headless`] DOM everywhere else.
*/

mod config;
mod core;
mod describe;
mod markers;
mod platform;

mod types;
pub use types::*;

pub use crate::config::{BridgeBuilder, DEFAULT_EVENT_CHANNEL_CAPACITY};
pub use crate::core::{Bridge, SelectionCallback};
pub use crate::describe::{normalize_text, DEFAULT_PATH_CLASS_LIMIT, DEFAULT_TEXT_LIMIT};
pub use crate::markers::{
  Markers, DEFAULT_HOVER_CLASS, DEFAULT_SELECTED_CLASS, DEFAULT_STYLE_ID,
};
pub use crate::platform::headless;
pub use crate::platform::{DocumentAccess, Disposition, Dom, ElementHandle, EventSink};
#[cfg(target_arch = "wasm32")]
pub use crate::platform::{WebDom, WebListeners};
