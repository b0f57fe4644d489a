/*! Browser platform built on `web-sys`.

Iframe content lives in another window, so its nodes are instances of that
window's constructors. Type checks therefore go through the prototype of the
document's own `HTMLElement` instead of `JsCast::dyn_ref`, and handles are
converted with `unchecked_into` once the check has passed.
*/

use std::rc::Rc;

use js_sys::{Object, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, HtmlIFrameElement, MouseEvent, Node};

use crate::platform::{Disposition, DocumentAccess, Dom, ElementHandle, EventSink};
use crate::types::{FramepickError, FramepickResult};

const MOUSE_MOVE: &str = "mousemove";
const MOUSE_OUT: &str = "mouseout";
const CLICK: &str = "click";

/// Platform marker for the browser DOM.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebDom;

fn js_error(value: &JsValue) -> String {
  value
    .as_string()
    .or_else(|| {
      value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
    })
    .unwrap_or_else(|| format!("{value:?}"))
}

fn is_missing(value: &JsValue) -> bool {
  value.is_null() || value.is_undefined()
}

/// `contentDocument` is null for cross-origin frames in current browsers, so
/// a null document is only "not ready" if the frame's window lets us look.
fn probe_content_window(frame: &HtmlIFrameElement) -> DocumentAccess<Document> {
  let window = match Reflect::get(frame, &JsValue::from_str("contentWindow")) {
    Ok(window) if is_missing(&window) => return DocumentAccess::NotReady,
    Ok(window) => window,
    Err(err) => {
      log::warn!("iframe contentWindow access threw: {}", js_error(&err));
      return DocumentAccess::Denied;
    }
  };
  match Reflect::get(&window, &JsValue::from_str("document")) {
    Ok(_) => DocumentAccess::NotReady,
    Err(err) => {
      log::warn!(
        "cross-origin iframe, cannot inject visual editor: {}",
        js_error(&err)
      );
      DocumentAccess::Denied
    }
  }
}

/// Prototype of `HTMLElement` in the document's own window.
fn html_element_prototype(doc: &Document) -> Option<Object> {
  let view = doc.default_view()?;
  let ctor = Reflect::get(&view, &JsValue::from_str("HTMLElement")).ok()?;
  if is_missing(&ctor) {
    return None;
  }
  let prototype = Reflect::get(&ctor, &JsValue::from_str("prototype")).ok()?;
  prototype
    .is_object()
    .then(|| prototype.unchecked_into::<Object>())
}

fn event_node(target: Option<web_sys::EventTarget>) -> Option<Node> {
  let target: JsValue = target?.into();
  target.is_object().then(|| target.unchecked_into::<Node>())
}

impl ElementHandle for HtmlElement {
  fn fetch_tag(&self) -> String {
    web_sys::Element::tag_name(self)
  }

  fn fetch_id(&self) -> String {
    web_sys::Element::id(self)
  }

  fn fetch_class_name(&self) -> String {
    web_sys::Element::class_name(self)
  }

  fn fetch_classes(&self) -> Vec<String> {
    let list = web_sys::Element::class_list(self);
    (0..list.length()).filter_map(|i| list.item(i)).collect()
  }

  fn fetch_text(&self) -> String {
    HtmlElement::inner_text(self)
  }

  fn fetch_attributes(&self) -> Vec<(String, String)> {
    let attributes = web_sys::Element::attributes(self);
    (0..attributes.length())
      .filter_map(|i| attributes.item(i))
      .map(|attr| (attr.name(), attr.value()))
      .collect()
  }

  fn fetch_parent(&self) -> Option<Self> {
    Node::parent_element(self).map(JsCast::unchecked_into)
  }

  fn fetch_children(&self) -> Vec<Self> {
    let children = web_sys::Element::children(self);
    (0..children.length())
      .filter_map(|i| children.item(i))
      .map(JsCast::unchecked_into)
      .collect()
  }

  fn add_marker(&self, class: &str) {
    if let Err(err) = web_sys::Element::class_list(self).add_1(class) {
      log::debug!("classList.add({class}) failed: {}", js_error(&err));
    }
  }

  fn remove_marker(&self, class: &str) {
    if let Err(err) = web_sys::Element::class_list(self).remove_1(class) {
      log::debug!("classList.remove({class}) failed: {}", js_error(&err));
    }
  }
}

/// Capture listeners on an iframe document. Detaches on drop.
pub struct WebListeners {
  document: Document,
  on_move: Closure<dyn FnMut(MouseEvent)>,
  on_out: Closure<dyn FnMut(MouseEvent)>,
  on_click: Closure<dyn FnMut(MouseEvent)>,
}

impl std::fmt::Debug for WebListeners {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("WebListeners").finish_non_exhaustive()
  }
}

impl WebListeners {
  fn registrations(&self) -> [(&'static str, &Closure<dyn FnMut(MouseEvent)>); 3] {
    [
      (MOUSE_MOVE, &self.on_move),
      (MOUSE_OUT, &self.on_out),
      (CLICK, &self.on_click),
    ]
  }

  fn attach(&self) -> FramepickResult<()> {
    for (event, closure) in self.registrations() {
      self
        .document
        .add_event_listener_with_callback_and_bool(event, closure.as_ref().unchecked_ref(), true)
        .map_err(|err| FramepickError::Listener(format!("{event}: {}", js_error(&err))))?;
    }
    Ok(())
  }
}

impl Drop for WebListeners {
  fn drop(&mut self) {
    for (event, closure) in self.registrations() {
      drop(self.document.remove_event_listener_with_callback_and_bool(
        event,
        closure.as_ref().unchecked_ref(),
        true,
      ));
    }
  }
}

impl Dom for WebDom {
  type Frame = HtmlIFrameElement;
  type Document = Document;
  type Element = HtmlElement;
  type Node = Node;
  type Listeners = WebListeners;

  fn content_document(frame: &HtmlIFrameElement) -> DocumentAccess<Document> {
    // Reflect::get surfaces a SecurityError as Err instead of throwing through
    match Reflect::get(frame, &JsValue::from_str("contentDocument")) {
      Ok(doc) if is_missing(&doc) => probe_content_window(frame),
      Ok(doc) => DocumentAccess::Ready(doc.unchecked_into()),
      Err(err) => {
        log::warn!(
          "cross-origin iframe, cannot inject visual editor: {}",
          js_error(&err)
        );
        DocumentAccess::Denied
      }
    }
  }

  fn body(doc: &Document) -> Option<HtmlElement> {
    doc.body()
  }

  fn root_element(doc: &Document) -> Option<HtmlElement> {
    doc.document_element().map(JsCast::unchecked_into)
  }

  fn contains_id(doc: &Document, id: &str) -> bool {
    doc.get_element_by_id(id).is_some()
  }

  fn insert_style(doc: &Document, id: &str, css: &str) -> FramepickResult<()> {
    let head = doc
      .head()
      .ok_or_else(|| FramepickError::StyleInjection("document has no <head>".into()))?;
    let style = doc
      .create_element("style")
      .map_err(|err| FramepickError::StyleInjection(js_error(&err)))?;
    style.set_id(id);
    style.set_text_content(Some(css));
    head
      .append_child(&style)
      .map_err(|err| FramepickError::StyleInjection(js_error(&err)))?;
    Ok(())
  }

  fn as_element(doc: &Document, node: &Node) -> Option<HtmlElement> {
    let is_html_element = match html_element_prototype(doc) {
      Some(prototype) => prototype.is_prototype_of(node),
      // No window (detached document): fall back to the host window's constructor
      None => node.dyn_ref::<HtmlElement>().is_some(),
    };
    is_html_element.then(|| node.clone().unchecked_into())
  }

  fn parent_node(node: &Node) -> Option<Node> {
    node.parent_element().map(Node::from)
  }

  fn listen(doc: &Document, sink: Rc<dyn EventSink<Node>>) -> FramepickResult<WebListeners> {
    let move_sink = Rc::clone(&sink);
    let on_move = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
      move_sink.pointer_moved(event_node(event.target()));
    });

    let out_sink = Rc::clone(&sink);
    let on_out = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
      out_sink.pointer_left(event_node(event.related_target()));
    });

    let on_click = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
      if sink.clicked(event_node(event.target())) == Disposition::Suppress {
        event.prevent_default();
        event.stop_propagation();
      }
    });

    let listeners = WebListeners {
      document: doc.clone(),
      on_move,
      on_out,
      on_click,
    };
    // On failure the partially attached listeners are removed by Drop
    listeners.attach()?;
    Ok(listeners)
  }
}
