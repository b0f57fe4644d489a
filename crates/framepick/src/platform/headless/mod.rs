/*!
Headless DOM platform.

An in-memory document model that implements the platform traits, so the
bridge can be driven outside a browser: native hosts, tests, and tools that
replay recorded pointer sessions.

```
use framepick::headless::{Document, Frame, HeadlessDom};
use framepick::Bridge;

let doc = Document::new();
let button = doc.body().append(doc.create_element("button"));
button.append_text("Save");

let bridge = Bridge::<HeadlessDom>::new(|selection| {
  if let Some(element) = selection {
    assert_eq!(element.tag_name, "button");
  }
});
bridge.set_frame(Some(Frame::with_document(doc.clone())));
assert!(bridge.enable());

let outcome = doc.click(&button.node());
assert!(!outcome.reached_page());
```
*/

mod events;
mod tree;

pub use events::{DispatchOutcome, Listeners};
pub use tree::{Document, Element, Node};

use std::cell::RefCell;
use std::rc::Rc;

use crate::platform::{DocumentAccess, Dom, EventSink};
use crate::types::FramepickResult;

#[derive(Debug, Clone)]
enum FrameState {
  Loading,
  Loaded(Document),
  CrossOrigin,
}

/// An embedding frame whose document can load, unload or become cross-origin.
#[derive(Clone)]
pub struct Frame {
  state: Rc<RefCell<FrameState>>,
}

impl PartialEq for Frame {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.state, &other.state)
  }
}

impl std::fmt::Debug for Frame {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Frame")
      .field("state", &*self.state.borrow())
      .finish()
  }
}

impl Default for Frame {
  fn default() -> Self {
    Self::new()
  }
}

impl Frame {
  /// A frame that has not loaded a document yet.
  pub fn new() -> Self {
    Self::from_state(FrameState::Loading)
  }

  /// A frame showing `doc`.
  pub fn with_document(doc: Document) -> Self {
    Self::from_state(FrameState::Loaded(doc))
  }

  /// A frame showing a document from another origin.
  pub fn cross_origin() -> Self {
    Self::from_state(FrameState::CrossOrigin)
  }

  fn from_state(state: FrameState) -> Self {
    Self {
      state: Rc::new(RefCell::new(state)),
    }
  }

  /// Finish loading `doc` into this frame.
  pub fn load(&self, doc: Document) {
    *self.state.borrow_mut() = FrameState::Loaded(doc);
  }

  /// Start a navigation; the document is unavailable until `load`.
  pub fn unload(&self) {
    *self.state.borrow_mut() = FrameState::Loading;
  }

  /// Navigate to another origin.
  pub fn navigate_cross_origin(&self) {
    *self.state.borrow_mut() = FrameState::CrossOrigin;
  }

  /// Current document, if same-origin and loaded.
  pub fn document(&self) -> Option<Document> {
    match &*self.state.borrow() {
      FrameState::Loaded(doc) => Some(doc.clone()),
      FrameState::Loading | FrameState::CrossOrigin => None,
    }
  }
}

/// Platform marker for the headless DOM.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessDom;

impl Dom for HeadlessDom {
  type Frame = Frame;
  type Document = Document;
  type Element = Element;
  type Node = Node;
  type Listeners = Listeners;

  fn content_document(frame: &Frame) -> DocumentAccess<Document> {
    match &*frame.state.borrow() {
      FrameState::Loaded(doc) => DocumentAccess::Ready(doc.clone()),
      FrameState::Loading => DocumentAccess::NotReady,
      FrameState::CrossOrigin => DocumentAccess::Denied,
    }
  }

  fn body(doc: &Document) -> Option<Element> {
    Some(doc.body())
  }

  fn root_element(doc: &Document) -> Option<Element> {
    Some(doc.document_element())
  }

  fn contains_id(doc: &Document, id: &str) -> bool {
    doc.element_by_id(id).is_some()
  }

  fn insert_style(doc: &Document, id: &str, css: &str) -> FramepickResult<()> {
    let style = doc.create_element("style").with_attribute("id", id);
    style.append_text(css);
    doc.head().append(style);
    Ok(())
  }

  fn as_element(doc: &Document, node: &Node) -> Option<Element> {
    // Nodes of another document fail the check, like elements of another
    // window fail `instanceof` against this window's `HTMLElement`.
    if node.owner_document() != doc || !node.is_html_element() {
      return None;
    }
    node.as_element()
  }

  fn parent_node(node: &Node) -> Option<Node> {
    node.parent_element().map(|e| e.node())
  }

  fn listen(doc: &Document, sink: Rc<dyn EventSink<Node>>) -> FramepickResult<Listeners> {
    Ok(events::register(doc, sink))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::platform::ElementHandle;

  #[test]
  fn frame_state_maps_to_document_access() {
    let frame = Frame::new();
    assert_eq!(HeadlessDom::content_document(&frame), DocumentAccess::NotReady);

    let doc = Document::new();
    frame.load(doc.clone());
    assert_eq!(
      HeadlessDom::content_document(&frame),
      DocumentAccess::Ready(doc)
    );

    frame.navigate_cross_origin();
    assert_eq!(HeadlessDom::content_document(&frame), DocumentAccess::Denied);
  }

  #[test]
  fn as_element_rejects_text_foreign_and_other_document_nodes() {
    let doc = Document::new();
    let other = Document::new();
    let div = doc.body().append(doc.create_element("div"));
    let text = div.append_text("hi");
    let svg = div.append(doc.create_svg_element("svg"));
    let stranger = other.body().append(other.create_element("div"));

    assert_eq!(HeadlessDom::as_element(&doc, &div.node()), Some(div.clone()));
    assert_eq!(HeadlessDom::as_element(&doc, &text), None);
    assert_eq!(HeadlessDom::as_element(&doc, &svg.node()), None);
    assert_eq!(HeadlessDom::as_element(&doc, &stranger.node()), None);
    assert_eq!(HeadlessDom::parent_node(&text), Some(div.node()));
  }

  #[test]
  fn insert_style_lands_in_head() {
    let doc = Document::new();
    HeadlessDom::insert_style(&doc, "marker-style", ".x { color: red; }").unwrap();
    let style = doc.element_by_id("marker-style").unwrap();
    assert_eq!(style.tag_name(), "STYLE");
    assert_eq!(style.fetch_parent(), Some(doc.head()));
    assert!(HeadlessDom::contains_id(&doc, "marker-style"));
  }
}
