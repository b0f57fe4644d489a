/*!
Arena-backed document tree.

Nodes live in a flat `Vec` owned by the document and refer to each other by
index. Handles (`Node`, `Element`) are an `Rc` to the arena plus an index, so
cloning is cheap and equality is identity.

## Invariants

1. **Single parent**: a node is listed in at most one parent's `children`.
2. **Bidirectional consistency**: `nodes[c].parent == Some(p)` iff `nodes[p].children` contains `c`.
3. Classes are stored in the `class` attribute and normalized like `DOMTokenList`.
*/

use std::cell::RefCell;
use std::rc::Rc;

use super::events::Registration;
use crate::platform::ElementHandle;

/// Tags whose contents never render as text.
const NON_RENDERED_TAGS: [&str; 3] = ["HEAD", "SCRIPT", "STYLE"];

pub(super) enum NodeKind {
  Element {
    tag: String,
    /// False for foreign (e.g. SVG) elements, which are not `HTMLElement`s.
    html: bool,
    attributes: Vec<(String, String)>,
  },
  Text(String),
  Comment,
}

pub(super) struct NodeData {
  pub(super) kind: NodeKind,
  pub(super) parent: Option<usize>,
  pub(super) children: Vec<usize>,
}

pub(super) struct Tree {
  pub(super) nodes: Vec<NodeData>,
  pub(super) listeners: Vec<Registration>,
  pub(super) next_listener: u64,
  root: usize,
  head: usize,
  body: usize,
}

impl Tree {
  fn push(&mut self, kind: NodeKind) -> usize {
    self.nodes.push(NodeData {
      kind,
      parent: None,
      children: Vec::new(),
    });
    self.nodes.len() - 1
  }

  fn attributes(&self, index: usize) -> Option<&Vec<(String, String)>> {
    match self.nodes.get(index).map(|n| &n.kind) {
      Some(NodeKind::Element { attributes, .. }) => Some(attributes),
      Some(NodeKind::Text(_) | NodeKind::Comment) | None => None,
    }
  }

  fn attributes_mut(&mut self, index: usize) -> Option<&mut Vec<(String, String)>> {
    match self.nodes.get_mut(index).map(|n| &mut n.kind) {
      Some(NodeKind::Element { attributes, .. }) => Some(attributes),
      Some(NodeKind::Text(_) | NodeKind::Comment) | None => None,
    }
  }

  fn attribute(&self, index: usize, name: &str) -> Option<String> {
    self
      .attributes(index)?
      .iter()
      .find(|(n, _)| n == name)
      .map(|(_, v)| v.clone())
  }

  fn set_attribute(&mut self, index: usize, name: &str, value: &str) {
    let Some(attributes) = self.attributes_mut(index) else {
      return;
    };
    match attributes.iter_mut().find(|(n, _)| n == name) {
      Some((_, v)) => *v = value.to_string(),
      None => attributes.push((name.to_string(), value.to_string())),
    }
  }

  fn parent(&self, index: usize) -> Option<usize> {
    self.nodes.get(index)?.parent
  }

  fn children(&self, index: usize) -> &[usize] {
    self.nodes.get(index).map_or(&[], |n| n.children.as_slice())
  }

  fn is_element(&self, index: usize) -> bool {
    matches!(
      self.nodes.get(index).map(|n| &n.kind),
      Some(NodeKind::Element { .. })
    )
  }

  fn tag(&self, index: usize) -> Option<&str> {
    match self.nodes.get(index).map(|n| &n.kind) {
      Some(NodeKind::Element { tag, .. }) => Some(tag),
      Some(NodeKind::Text(_) | NodeKind::Comment) | None => None,
    }
  }

  /// Whether `ancestor` is `index` or one of its ancestors.
  fn is_inclusive_ancestor(&self, ancestor: usize, index: usize) -> bool {
    let mut current = Some(index);
    while let Some(node) = current {
      if node == ancestor {
        return true;
      }
      current = self.parent(node);
    }
    false
  }

  /// Detach `child` from its parent, if any.
  fn detach(&mut self, child: usize) {
    if let Some(old) = self.parent(child) {
      if let Some(old_parent) = self.nodes.get_mut(old) {
        old_parent.children.retain(|&c| c != child);
      }
    }
    if let Some(node) = self.nodes.get_mut(child) {
      node.parent = None;
    }
  }

  /// Move `child` under `parent`, detaching it from any previous parent.
  ///
  /// Returns false, leaving the tree untouched, when `child` is `parent` or
  /// one of its ancestors.
  fn append(&mut self, parent: usize, child: usize) -> bool {
    if self.is_inclusive_ancestor(child, parent) {
      return false;
    }
    if let Some(old) = self.parent(child) {
      if let Some(old_parent) = self.nodes.get_mut(old) {
        old_parent.children.retain(|&c| c != child);
      }
    }
    if let Some(node) = self.nodes.get_mut(child) {
      node.parent = Some(parent);
    }
    if let Some(node) = self.nodes.get_mut(parent) {
      node.children.push(child);
    }
    true
  }

  /// Pre-order walk of everything connected to the root.
  fn connected(&self) -> Vec<usize> {
    let mut order = Vec::new();
    let mut stack = vec![self.root];
    while let Some(index) = stack.pop() {
      order.push(index);
      stack.extend(self.children(index).iter().rev());
    }
    order
  }

  /// Concatenated text of rendered descendants.
  fn rendered_text(&self, index: usize, out: &mut String) {
    match self.nodes.get(index).map(|n| &n.kind) {
      Some(NodeKind::Text(text)) => out.push_str(text),
      Some(NodeKind::Element { tag, .. }) if NON_RENDERED_TAGS.contains(&tag.as_str()) => {}
      Some(NodeKind::Element { .. }) => {
        for &child in self.children(index) {
          self.rendered_text(child, out);
        }
      }
      Some(NodeKind::Comment) | None => {}
    }
  }
}

fn class_tokens(value: &str) -> Vec<String> {
  let mut tokens: Vec<String> = Vec::new();
  for token in value.split_whitespace() {
    if !tokens.iter().any(|t| t == token) {
      tokens.push(token.to_string());
    }
  }
  tokens
}

/// An in-memory document: `<html>` with `<head>` and `<body>`.
#[derive(Clone)]
pub struct Document {
  pub(super) tree: Rc<RefCell<Tree>>,
}

impl PartialEq for Document {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.tree, &other.tree)
  }
}

impl std::fmt::Debug for Document {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Document")
      .field("nodes", &self.tree.borrow().nodes.len())
      .finish_non_exhaustive()
  }
}

impl Default for Document {
  fn default() -> Self {
    Self::new()
  }
}

impl Document {
  /// Create an empty document.
  pub fn new() -> Self {
    let mut tree = Tree {
      nodes: Vec::new(),
      listeners: Vec::new(),
      next_listener: 1,
      root: 0,
      head: 0,
      body: 0,
    };
    let element = |tag: &str| NodeKind::Element {
      tag: tag.to_string(),
      html: true,
      attributes: Vec::new(),
    };
    tree.root = tree.push(element("HTML"));
    tree.head = tree.push(element("HEAD"));
    tree.body = tree.push(element("BODY"));
    tree.append(tree.root, tree.head);
    tree.append(tree.root, tree.body);
    Self {
      tree: Rc::new(RefCell::new(tree)),
    }
  }

  /// Read the tree. Never dispatch events inside the closure.
  #[inline]
  pub(super) fn read<R>(&self, f: impl FnOnce(&Tree) -> R) -> R {
    f(&self.tree.borrow())
  }

  /// Write the tree. Never dispatch events inside the closure.
  #[inline]
  pub(super) fn write<R>(&self, f: impl FnOnce(&mut Tree) -> R) -> R {
    f(&mut self.tree.borrow_mut())
  }

  fn element_at(&self, index: usize) -> Element {
    Element {
      node: Node {
        doc: self.clone(),
        index,
      },
    }
  }

  /// The `<html>` element.
  pub fn document_element(&self) -> Element {
    self.element_at(self.read(|t| t.root))
  }

  /// The `<head>` element.
  pub fn head(&self) -> Element {
    self.element_at(self.read(|t| t.head))
  }

  /// The `<body>` element.
  pub fn body(&self) -> Element {
    self.element_at(self.read(|t| t.body))
  }

  /// Create a detached HTML element. The tag is stored uppercase.
  pub fn create_element(&self, tag: &str) -> Element {
    let index = self.write(|t| {
      t.push(NodeKind::Element {
        tag: tag.to_ascii_uppercase(),
        html: true,
        attributes: Vec::new(),
      })
    });
    self.element_at(index)
  }

  /// Create a detached foreign (SVG) element. The tag keeps its case.
  pub fn create_svg_element(&self, tag: &str) -> Element {
    let index = self.write(|t| {
      t.push(NodeKind::Element {
        tag: tag.to_string(),
        html: false,
        attributes: Vec::new(),
      })
    });
    self.element_at(index)
  }

  /// Create a detached text node.
  pub fn create_text_node(&self, text: &str) -> Node {
    let index = self.write(|t| t.push(NodeKind::Text(text.to_string())));
    Node {
      doc: self.clone(),
      index,
    }
  }

  /// Create a detached comment node.
  pub fn create_comment(&self) -> Node {
    let index = self.write(|t| t.push(NodeKind::Comment));
    Node {
      doc: self.clone(),
      index,
    }
  }

  /// First connected element with this id.
  pub fn element_by_id(&self, id: &str) -> Option<Element> {
    let index = self.read(|t| {
      t.connected()
        .into_iter()
        .find(|&i| t.attribute(i, "id").as_deref() == Some(id))
    })?;
    Some(self.element_at(index))
  }

  /// Connected elements carrying `class`, in document order.
  pub fn elements_with_class(&self, class: &str) -> Vec<Element> {
    let indices: Vec<usize> = self.read(|t| {
      t.connected()
        .into_iter()
        .filter(|&i| {
          t.attribute(i, "class")
            .is_some_and(|v| v.split_whitespace().any(|c| c == class))
        })
        .collect()
    });
    indices.into_iter().map(|i| self.element_at(i)).collect()
  }
}

/// Any node in a headless document.
#[derive(Clone)]
pub struct Node {
  pub(super) doc: Document,
  pub(super) index: usize,
}

impl PartialEq for Node {
  fn eq(&self, other: &Self) -> bool {
    self.doc == other.doc && self.index == other.index
  }
}

impl std::fmt::Debug for Node {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Node")
      .field("index", &self.index)
      .finish_non_exhaustive()
  }
}

impl Node {
  /// Document that owns this node.
  pub fn owner_document(&self) -> &Document {
    &self.doc
  }

  /// This node as an element, if it is one (HTML or foreign).
  pub fn as_element(&self) -> Option<Element> {
    self
      .doc
      .read(|t| t.is_element(self.index))
      .then(|| self.doc.element_at(self.index))
  }

  /// Parent element, if attached.
  pub fn parent_element(&self) -> Option<Element> {
    let parent = self.doc.read(|t| t.parent(self.index))?;
    Some(self.doc.element_at(parent))
  }

  pub(super) fn is_html_element(&self) -> bool {
    self.doc.read(|t| {
      matches!(
        t.nodes.get(self.index).map(|n| &n.kind),
        Some(NodeKind::Element { html: true, .. })
      )
    })
  }
}

/// An element in a headless document.
#[derive(Clone, PartialEq)]
pub struct Element {
  node: Node,
}

impl std::fmt::Debug for Element {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Element")
      .field("tag", &self.tag_name())
      .field("index", &self.node.index)
      .finish_non_exhaustive()
  }
}

impl AsRef<Node> for Element {
  fn as_ref(&self) -> &Node {
    &self.node
  }
}

impl Element {
  /// This element as a node (for dispatching events at it).
  pub fn node(&self) -> Node {
    self.node.clone()
  }

  /// Tag name as stored (uppercase for HTML elements).
  pub fn tag_name(&self) -> String {
    self
      .node
      .doc
      .read(|t| t.tag(self.node.index).unwrap_or_default().to_string())
  }

  /// Append `child` (element or other node) as the last child.
  ///
  /// Nodes from another document are ignored.
  pub fn append_child(&self, child: &Node) {
    if child.doc != self.node.doc {
      log::warn!("append_child: node belongs to another document, ignoring");
      return;
    }
    let appended = self
      .node
      .doc
      .write(|t| t.append(self.node.index, child.index));
    if !appended {
      log::warn!("append_child: node is an ancestor of the new parent, ignoring");
    }
  }

  /// Detach this element from its parent, like `Element.remove()`.
  pub fn remove(&self) {
    self.node.doc.write(|t| t.detach(self.node.index));
  }

  /// Append an element and return it, for chaining tree construction.
  pub fn append(&self, child: Element) -> Element {
    self.append_child(&child.node);
    child
  }

  /// Append a text node and return it.
  pub fn append_text(&self, text: &str) -> Node {
    let node = self.node.doc.create_text_node(text);
    self.append_child(&node);
    node
  }

  /// Read an attribute.
  pub fn attribute(&self, name: &str) -> Option<String> {
    self.node.doc.read(|t| t.attribute(self.node.index, name))
  }

  /// Set an attribute, keeping its position if it already exists.
  pub fn set_attribute(&self, name: &str, value: &str) {
    self
      .node
      .doc
      .write(|t| t.set_attribute(self.node.index, name, value));
  }

  /// Builder-style `set_attribute`.
  #[must_use]
  pub fn with_attribute(self, name: &str, value: &str) -> Self {
    self.set_attribute(name, value);
    self
  }

  /// Whether the class list contains `class`.
  pub fn has_class(&self, class: &str) -> bool {
    self.fetch_classes().iter().any(|c| c == class)
  }

  fn update_classes(&self, f: impl FnOnce(&mut Vec<String>)) {
    let index = self.node.index;
    self.node.doc.write(|t| {
      let existing = t.attribute(index, "class");
      let mut tokens = existing.as_deref().map(class_tokens).unwrap_or_default();
      f(&mut tokens);
      // DOMTokenList leaves an absent attribute absent when nothing is added
      if existing.is_none() && tokens.is_empty() {
        return;
      }
      t.set_attribute(index, "class", &tokens.join(" "));
    });
  }
}

impl ElementHandle for Element {
  fn fetch_tag(&self) -> String {
    self.tag_name()
  }

  fn fetch_id(&self) -> String {
    self.attribute("id").unwrap_or_default()
  }

  fn fetch_class_name(&self) -> String {
    self.attribute("class").unwrap_or_default()
  }

  fn fetch_classes(&self) -> Vec<String> {
    self
      .attribute("class")
      .as_deref()
      .map(class_tokens)
      .unwrap_or_default()
  }

  fn fetch_text(&self) -> String {
    let mut out = String::new();
    self
      .node
      .doc
      .read(|t| t.rendered_text(self.node.index, &mut out));
    out
  }

  fn fetch_attributes(&self) -> Vec<(String, String)> {
    self
      .node
      .doc
      .read(|t| t.attributes(self.node.index).cloned().unwrap_or_default())
  }

  fn fetch_parent(&self) -> Option<Self> {
    self.node.parent_element()
  }

  fn fetch_children(&self) -> Vec<Self> {
    let doc = &self.node.doc;
    let indices: Vec<usize> = doc.read(|t| {
      t.children(self.node.index)
        .iter()
        .copied()
        .filter(|&c| t.is_element(c))
        .collect()
    });
    indices.into_iter().map(|i| doc.element_at(i)).collect()
  }

  fn add_marker(&self, class: &str) {
    self.update_classes(|tokens| {
      if !tokens.iter().any(|t| t == class) {
        tokens.push(class.to_string());
      }
    });
  }

  fn remove_marker(&self, class: &str) {
    self.update_classes(|tokens| tokens.retain(|t| t != class));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_document_has_head_and_body_under_root() {
    let doc = Document::new();
    let root = doc.document_element();
    assert_eq!(root.tag_name(), "HTML");
    let children: Vec<String> = root.fetch_children().iter().map(Element::tag_name).collect();
    assert_eq!(children, vec!["HEAD", "BODY"]);
    assert_eq!(doc.body().fetch_parent(), Some(root));
    assert_eq!(doc.document_element().fetch_parent(), None);
  }

  #[test]
  fn append_moves_node_between_parents() {
    let doc = Document::new();
    let a = doc.body().append(doc.create_element("div"));
    let b = doc.body().append(doc.create_element("div"));
    let span = a.append(doc.create_element("span"));

    b.append_child(&span.node());

    assert!(a.fetch_children().is_empty());
    assert_eq!(b.fetch_children(), vec![span.clone()]);
    assert_eq!(span.fetch_parent(), Some(b));
  }

  #[test]
  fn append_refuses_ancestor_cycles() {
    let doc = Document::new();
    let html = doc.document_element();
    let body = doc.body();
    let div = body.append(doc.create_element("div"));
    let span = div.append(doc.create_element("span"));

    div.append_child(&body.node());
    span.append_child(&div.node());
    span.append_child(&span.node());

    assert_eq!(body.fetch_parent(), Some(html));
    assert_eq!(div.fetch_parent(), Some(body.clone()));
    assert_eq!(span.fetch_parent(), Some(div.clone()));
    assert!(span.fetch_children().is_empty());
    assert_eq!(doc.elements_with_class("none"), Vec::<Element>::new());
    assert_eq!(body.fetch_children(), vec![div]);
  }

  #[test]
  fn remove_detaches_from_lookup() {
    let doc = Document::new();
    let div = doc
      .body()
      .append(doc.create_element("div").with_attribute("id", "gone"));

    div.remove();
    assert_eq!(div.fetch_parent(), None);
    assert!(doc.body().fetch_children().is_empty());
    assert_eq!(doc.element_by_id("gone"), None);
  }

  #[test]
  fn class_list_behaves_like_dom_token_list() {
    let doc = Document::new();
    let el = doc.create_element("p");

    el.remove_marker("missing");
    assert_eq!(el.attribute("class"), None, "removing from absent attribute keeps it absent");

    el.set_attribute("class", "  a   b a ");
    el.add_marker("c");
    assert_eq!(el.fetch_class_name(), "a b c");

    el.add_marker("a");
    assert_eq!(el.fetch_classes(), vec!["a", "b", "c"]);

    for class in ["a", "b", "c"] {
      el.remove_marker(class);
    }
    assert_eq!(el.attribute("class").as_deref(), Some(""));
  }

  #[test]
  fn rendered_text_skips_style_and_comments() {
    let doc = Document::new();
    let div = doc.body().append(doc.create_element("div"));
    div.append_text("Hello ");
    div.append(doc.create_element("style")).append_text(".x{}");
    div.append_child(&doc.create_comment());
    div.append(doc.create_element("b")).append_text("world");

    assert_eq!(div.fetch_text(), "Hello world");
  }

  #[test]
  fn lookup_ignores_detached_elements() {
    let doc = Document::new();
    let attached = doc
      .body()
      .append(doc.create_element("div").with_attribute("id", "x"));
    let _detached = doc.create_element("div").with_attribute("id", "y");

    assert_eq!(doc.element_by_id("x"), Some(attached));
    assert_eq!(doc.element_by_id("y"), None);
  }
}
