//! Browser tests against a real same-origin iframe.
//!
//! Run with `wasm-pack test --headless --firefox crates/framepick-web`.

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use framepick::{Bridge, BridgeError, SelectedElement, WebDom};
use framepick_web::JsBridge;
use js_sys::Promise;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Document, HtmlElement, HtmlIFrameElement, MouseEvent, MouseEventInit};

wasm_bindgen_test_configure!(run_in_browser);

fn host_document() -> Document {
  web_sys::window().unwrap().document().unwrap()
}

/// An attached `about:blank` iframe; its document is available synchronously.
fn iframe() -> (HtmlIFrameElement, Document) {
  let host = host_document();
  let frame: HtmlIFrameElement = host.create_element("iframe").unwrap().unchecked_into();
  host.body().unwrap().append_child(&frame).unwrap();
  let doc = frame.content_document().unwrap();
  (frame, doc)
}

fn element(doc: &Document, tag: &str, parent: &web_sys::Node) -> HtmlElement {
  let el: HtmlElement = doc.create_element(tag).unwrap().unchecked_into();
  parent.append_child(&el).unwrap();
  el
}

/// Dispatch a cancelable click; returns false when a listener prevented it.
fn click(target: &HtmlElement) -> bool {
  let init = MouseEventInit::new();
  init.set_bubbles(true);
  init.set_cancelable(true);
  let event = MouseEvent::new_with_mouse_event_init_dict("click", &init).unwrap();
  target.dispatch_event(&event).unwrap()
}

fn mouse_move(target: &HtmlElement) {
  let init = MouseEventInit::new();
  init.set_bubbles(true);
  let event = MouseEvent::new_with_mouse_event_init_dict("mousemove", &init).unwrap();
  target.dispatch_event(&event).unwrap();
}

fn recording_bridge() -> (Bridge<WebDom>, Rc<RefCell<Vec<Option<SelectedElement>>>>) {
  let log = Rc::new(RefCell::new(Vec::new()));
  let sink = Rc::clone(&log);
  let bridge = Bridge::<WebDom>::new(move |selection| sink.borrow_mut().push(selection));
  (bridge, log)
}

#[wasm_bindgen_test]
fn click_in_iframe_reports_descriptor() {
  let (frame, doc) = iframe();
  let body = doc.body().unwrap();
  let root = element(&doc, "div", &body);
  root.set_id("root");
  let section = element(&doc, "section", &root);
  let span = element(&doc, "span", &section);
  span.set_class_name("a b c");
  span.set_inner_text("Hello   world");

  let (bridge, log) = recording_bridge();
  bridge.set_frame(Some(frame.clone()));
  assert!(bridge.enable());
  assert!(doc.get_element_by_id("visual-editor-style").is_some());

  assert!(!click(&span));
  let selection = log.borrow().last().cloned().flatten().unwrap();
  assert_eq!(selection.tag_name, "span");
  assert_eq!(selection.path, "div#root > section > span.a.b");
  assert_eq!(selection.class_name.as_deref(), Some("a b c"));
  assert!(span.class_list().contains("visual-editor-selected"));

  bridge.destroy();
  assert!(!span.class_list().contains("visual-editor-selected"));
  frame.remove();
}

#[wasm_bindgen_test]
fn body_is_ignored_and_disable_releases_clicks() {
  let (frame, doc) = iframe();
  let body = doc.body().unwrap();
  let p = element(&doc, "p", &body);

  let (bridge, log) = recording_bridge();
  bridge.set_frame(Some(frame.clone()));
  assert!(bridge.enable());
  log.borrow_mut().clear();

  assert!(!click(&body));
  assert!(log.borrow().is_empty());

  mouse_move(&p);
  assert!(p.class_list().contains("visual-editor-hovered"));

  bridge.disable();
  assert!(!p.class_list().contains("visual-editor-hovered"));
  assert!(click(&p));
  assert!(log.borrow().is_empty());
  frame.remove();
}

#[wasm_bindgen_test]
fn detached_iframe_is_not_ready() {
  let host = host_document();
  let frame: HtmlIFrameElement = host.create_element("iframe").unwrap().unchecked_into();

  let (bridge, _log) = recording_bridge();
  bridge.set_frame(Some(frame));
  assert!(!bridge.enable());
  assert_eq!(bridge.last_error(), BridgeError::NotReady);
}

/// Sandboxed without `allow-same-origin`: the frame gets an opaque origin,
/// `contentDocument` reads as null and `contentWindow.document` throws.
async fn sandboxed_iframe() -> HtmlIFrameElement {
  let host = host_document();
  let frame: HtmlIFrameElement = host.create_element("iframe").unwrap().unchecked_into();
  frame.set_attribute("sandbox", "allow-scripts").unwrap();
  frame.set_attribute("srcdoc", "<p>isolated</p>").unwrap();

  let loaded = Promise::new(&mut |resolve, _reject| frame.set_onload(Some(&resolve)));
  host.body().unwrap().append_child(&frame).unwrap();
  JsFuture::from(loaded).await.unwrap();
  frame.set_onload(None);
  frame
}

#[wasm_bindgen_test]
async fn sandboxed_iframe_is_cross_origin() {
  let frame = sandboxed_iframe().await;
  assert!(frame.content_document().is_none());

  let (bridge, log) = recording_bridge();
  bridge.set_frame(Some(frame.clone()));
  assert_eq!(bridge.last_error(), BridgeError::CrossOrigin);
  assert!(!bridge.enable());
  assert!(!bridge.is_enabled());
  assert_eq!(bridge.last_error(), BridgeError::CrossOrigin);
  assert_eq!(log.borrow().as_slice(), [None]);

  let js = JsBridge::new(JsValue::UNDEFINED).unwrap_or_else(|_| panic!("default options"));
  js.set_iframe(Some(frame.clone()));
  assert!(!js.enable());
  assert_eq!(js.get_last_error(), "cross-origin");
  frame.remove();
}

#[wasm_bindgen_test]
fn js_class_reports_error_codes() {
  let Ok(bridge) = JsBridge::new(JsValue::UNDEFINED) else {
    panic!("default options must build");
  };
  assert!(!bridge.enable());
  assert_eq!(bridge.get_last_error(), "no-iframe");

  let (frame, _doc) = iframe();
  bridge.set_iframe(Some(frame.clone()));
  assert!(bridge.enable());
  assert_eq!(bridge.get_last_error(), "none");
  assert!(bridge.selected().is_null());
  bridge.destroy();
  frame.remove();
}
