/*!
Platform abstraction traits.

These traits define the contract between the bridge and a DOM implementation.
The browser implementation lives in `web.rs`; `headless/` is an in-memory DOM.
Core code only uses these traits - never platform-specific types directly.
*/

use std::rc::Rc;

use crate::types::FramepickResult;

/// Outcome of probing a frame for its document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentAccess<D> {
  /// The document is reachable.
  Ready(D),
  /// The frame has no document yet (not attached, still loading).
  NotReady,
  /// Reading the document threw (same-origin policy).
  Denied,
}

/// What a platform listener should do with the event after the bridge saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
  /// Let the event reach the page.
  Continue,
  /// Prevent the default action and stop propagation.
  Suppress,
}

/// Callbacks from platform listeners into the bridge.
///
/// Listeners are registered in the capture phase, so the sink sees every
/// event before the page's own handlers do.
pub trait EventSink<N> {
  /// Pointer moved over `target`.
  fn pointer_moved(&self, target: Option<N>);

  /// Pointer left an element towards `related` (`None` when leaving the document).
  fn pointer_left(&self, related: Option<N>);

  /// Click on `target`.
  fn clicked(&self, target: Option<N>) -> Disposition;
}

/// Per-element operations. Clone is cheap (reference-counted).
pub trait ElementHandle: Clone + PartialEq + 'static {
  /// Tag name as the platform reports it (uppercase for HTML elements).
  fn fetch_tag(&self) -> String;

  /// Value of the `id` attribute (empty if absent).
  fn fetch_id(&self) -> String;

  /// Raw class string (empty if absent).
  fn fetch_class_name(&self) -> String;

  /// Class names in order.
  fn fetch_classes(&self) -> Vec<String>;

  /// Rendered visible text.
  fn fetch_text(&self) -> String;

  /// Attribute name/value pairs in element order.
  fn fetch_attributes(&self) -> Vec<(String, String)>;

  /// Parent element. None for the root element or detached elements.
  fn fetch_parent(&self) -> Option<Self>;

  /// Child elements in document order.
  fn fetch_children(&self) -> Vec<Self>;

  /// Add a class (no-op if present).
  fn add_marker(&self, class: &str);

  /// Remove a class (no-op if absent).
  fn remove_marker(&self, class: &str);
}

/// Document-level operations for one platform.
pub trait Dom: 'static {
  /// Embedding frame (an iframe element).
  type Frame: Clone + PartialEq + 'static;
  /// A frame's document.
  type Document: Clone + PartialEq + 'static;
  /// An element inside a document.
  type Element: ElementHandle;
  /// Any node an event can target (elements, text, comments, ...).
  type Node: Clone + 'static;
  /// Registered listeners. Dropping the value detaches them.
  type Listeners: 'static;

  /// Probe a frame for its document. Must never panic or throw.
  fn content_document(frame: &Self::Frame) -> DocumentAccess<Self::Document>;

  /// The document's `<body>`.
  fn body(doc: &Self::Document) -> Option<Self::Element>;

  /// The document's root element (`<html>`).
  fn root_element(doc: &Self::Document) -> Option<Self::Element>;

  /// Whether any element in the document carries this id.
  fn contains_id(doc: &Self::Document, id: &str) -> bool;

  /// Append a `<style id=..>` element with `css` to the document head.
  fn insert_style(doc: &Self::Document, id: &str, css: &str) -> FramepickResult<()>;

  /// View `node` as an element, using the element constructor of the
  /// document's own window. None for text nodes, comments and foreign elements.
  fn as_element(doc: &Self::Document, node: &Self::Node) -> Option<Self::Element>;

  /// Parent element of `node`, as a node.
  fn parent_node(node: &Self::Node) -> Option<Self::Node>;

  /// Attach capture-phase pointer-move, pointer-out and click listeners.
  fn listen(
    doc: &Self::Document,
    sink: Rc<dyn EventSink<Self::Node>>,
  ) -> FramepickResult<Self::Listeners>;
}
