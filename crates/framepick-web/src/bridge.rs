/*!
`VisualEditorBridge` class exported to JavaScript.

Payloads cross the boundary as JSON and are parsed with `JSON.parse`, so hosts
receive plain objects matching the generated TypeScript types.
*/

use async_broadcast::RecvError;
use framepick::{Bridge, BridgeEvent, WebDom};
use js_sys::{Function, Reflect, JSON};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::HtmlIFrameElement;

use crate::options::{selection_json, BridgeOptions};

fn option(options: &JsValue, key: &str) -> Option<JsValue> {
  if !options.is_object() {
    return None;
  }
  Reflect::get(options, &JsValue::from_str(key))
    .ok()
    .filter(|v| !v.is_undefined() && !v.is_null())
}

// textLimit is a JS number; fractions truncate
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn read_options(options: &JsValue) -> (Option<Function>, BridgeOptions) {
  let callback = option(options, "onSelectionChange").and_then(|v| v.dyn_into::<Function>().ok());
  let parsed = BridgeOptions {
    style_id: option(options, "styleId").and_then(|v| v.as_string()),
    hover_class: option(options, "hoverClass").and_then(|v| v.as_string()),
    selected_class: option(options, "selectedClass").and_then(|v| v.as_string()),
    text_limit: option(options, "textLimit")
      .and_then(|v| v.as_f64())
      .filter(|n| n.is_finite() && *n >= 0.0)
      .map(|n| n as usize),
  };
  (callback, parsed)
}

fn parse_json(json: &str) -> JsValue {
  JSON::parse(json).unwrap_or(JsValue::NULL)
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
  match serde_json::to_string(value) {
    Ok(json) => parse_json(&json),
    Err(e) => {
      log::error!("Failed to serialize payload: {e}");
      JsValue::NULL
    }
  }
}

fn call(listener: &Function, arg: &JsValue) {
  if let Err(err) = listener.call1(&JsValue::NULL, arg) {
    log::error!("Host callback threw: {err:?}");
  }
}

/// Element picker for one same-origin iframe.
#[wasm_bindgen(js_name = VisualEditorBridge)]
#[derive(Debug)]
pub struct JsBridge {
  bridge: Bridge<WebDom>,
}

#[wasm_bindgen(js_class = VisualEditorBridge)]
impl JsBridge {
  /// `new VisualEditorBridge({ onSelectionChange, styleId?, hoverClass?, selectedClass?, textLimit? })`
  #[wasm_bindgen(constructor)]
  pub fn new(options: JsValue) -> Result<JsBridge, JsError> {
    let (callback, options) = read_options(&options);
    let mut builder = options.configure(Bridge::<WebDom>::builder());
    if let Some(callback) = callback {
      builder = builder.on_selection_change(move |selection| {
        call(&callback, &parse_json(&selection_json(selection.as_ref())));
      });
    }
    let bridge = builder.build().map_err(|e| JsError::new(&e.to_string()))?;
    Ok(Self { bridge })
  }

  /// Bind an iframe, or unbind with `null`.
  #[wasm_bindgen(js_name = setIframe)]
  pub fn set_iframe(&self, iframe: Option<HtmlIFrameElement>) {
    self.bridge.set_frame(iframe);
  }

  /// Start picking. False when the iframe document is unavailable; see `getLastError`.
  pub fn enable(&self) -> bool {
    self.bridge.enable()
  }

  /// Stop picking. The selection is kept.
  pub fn disable(&self) {
    self.bridge.disable();
  }

  /// Clear the selection and notify `onSelectionChange` with `null`.
  #[wasm_bindgen(js_name = clearSelection)]
  pub fn clear_selection(&self) {
    self.bridge.clear_selection();
  }

  /// Detach everything and release the iframe.
  pub fn destroy(&self) {
    self.bridge.destroy();
  }

  /// `"none" | "no-iframe" | "not-ready" | "cross-origin"`
  #[wasm_bindgen(js_name = getLastError)]
  pub fn get_last_error(&self) -> String {
    self.bridge.last_error().to_string()
  }

  /// Whether listeners are attached.
  #[wasm_bindgen(js_name = isEnabled)]
  pub fn is_enabled(&self) -> bool {
    self.bridge.is_enabled()
  }

  /// Fresh descriptor of the current selection, or `null`.
  pub fn selected(&self) -> JsValue {
    to_js(&self.bridge.selected())
  }

  /// CSS injected into the iframe document.
  pub fn stylesheet(&self) -> String {
    self.bridge.markers().stylesheet()
  }

  /// Forward every bridge event (`{ event, data }`) to `listener`.
  ///
  /// Delivery is asynchronous; the forwarding task ends when the bridge is freed.
  #[wasm_bindgen(js_name = onEvent)]
  pub fn on_event(&self, listener: Function) {
    let mut events = self.bridge.subscribe();
    wasm_bindgen_futures::spawn_local(async move {
      loop {
        let event: BridgeEvent = match events.recv().await {
          Ok(event) => event,
          Err(RecvError::Overflowed(skipped)) => {
            log::warn!("Event listener lagged, skipped {skipped} events");
            continue;
          }
          Err(RecvError::Closed) => break,
        };
        call(&listener, &to_js(&event));
      }
    });
  }
}

/// Factory equivalent to `new VisualEditorBridge(options)`.
#[wasm_bindgen(js_name = createVisualEditorBridge)]
pub fn create_visual_editor_bridge(options: JsValue) -> Result<JsBridge, JsError> {
  JsBridge::new(options)
}
