/*!
Framepick for JavaScript hosts.

```js
import init, { initLogging, VisualEditorBridge } from "framepick-web";

await init();
initLogging("debug");

const bridge = new VisualEditorBridge({
  onSelectionChange: (element) => console.log(element?.path ?? "cleared"),
});
bridge.setIframe(document.querySelector("iframe"));
if (!bridge.enable()) {
  console.warn(bridge.getLastError()); // "no-iframe" | "not-ready" | "cross-origin"
}
```

Payload and event types are generated by `framepick`'s `ts-rs` exports.
*/

// wasm-bindgen's generated glue uses unsafe blocks
#![allow(unsafe_code)]

#[cfg(target_arch = "wasm32")]
mod bridge;
#[cfg(target_arch = "wasm32")]
mod logging;
mod options;

#[cfg(target_arch = "wasm32")]
pub use bridge::{create_visual_editor_bridge, JsBridge};
#[cfg(target_arch = "wasm32")]
pub use logging::init_logging;
pub use options::{parse_level, selection_json, BridgeOptions};
