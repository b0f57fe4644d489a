/*!
Pointer and click handlers, called by platform listeners.

Listeners only exist while the bridge is enabled, but a handler still checks:
a dispatch already in flight can outlive `disable()`.
*/

use std::rc::Weak;

use super::state::Pending;
use super::Shared;
use crate::platform::{Disposition, Dom, EventSink};

/// Sink handed to platform listeners. Weak so listeners never keep the bridge alive.
pub(super) struct Sink<D: Dom> {
  pub(super) shared: Weak<Shared<D>>,
}

impl<D: Dom> EventSink<D::Node> for Sink<D> {
  fn pointer_moved(&self, target: Option<D::Node>) {
    if let Some(shared) = self.shared.upgrade() {
      shared.handle_pointer_move(target.as_ref());
    }
  }

  fn pointer_left(&self, related: Option<D::Node>) {
    if let Some(shared) = self.shared.upgrade() {
      shared.handle_pointer_out(related.as_ref());
    }
  }

  fn clicked(&self, target: Option<D::Node>) -> Disposition {
    match self.shared.upgrade() {
      Some(shared) => shared.handle_click(target.as_ref()),
      None => Disposition::Continue,
    }
  }
}

/// Element behind an event target: the node itself, or the parent of a text
/// node. Both checks use the document's own element constructor.
pub(crate) fn resolve_target<D: Dom>(doc: &D::Document, node: Option<&D::Node>) -> Option<D::Element> {
  let node = node?;
  D::as_element(doc, node).or_else(|| {
    let parent = D::parent_node(node)?;
    D::as_element(doc, &parent)
  })
}

/// Body and root are never hovered or selected.
pub(crate) fn is_structural<D: Dom>(doc: &D::Document, element: &D::Element) -> bool {
  D::body(doc).as_ref() == Some(element) || D::root_element(doc).as_ref() == Some(element)
}

impl<D: Dom> Shared<D> {
  pub(super) fn handle_pointer_move(&self, target: Option<&D::Node>) {
    let pending = self.write(|s, describer| {
      let mut pending = Pending::default();
      let Some(doc) = s.listening_document() else {
        return pending;
      };
      match resolve_target::<D>(&doc, target) {
        Some(element) if !is_structural::<D>(&doc, &element) => {
          s.set_hover(element, describer, &mut pending);
        }
        Some(_) | None => s.clear_hover(&describer.markers, &mut pending),
      }
      pending
    });
    self.deliver(pending);
  }

  pub(super) fn handle_pointer_out(&self, related: Option<&D::Node>) {
    let pending = self.write(|s, describer| {
      let mut pending = Pending::default();
      let Some(doc) = s.listening_document() else {
        return pending;
      };
      // An unresolvable related target means the pointer left the content
      if resolve_target::<D>(&doc, related).is_none() {
        s.clear_hover(&describer.markers, &mut pending);
      }
      pending
    });
    self.deliver(pending);
  }

  pub(super) fn handle_click(&self, target: Option<&D::Node>) -> Disposition {
    let (disposition, pending) = self.write(|s, describer| {
      let mut pending = Pending::default();
      let Some(doc) = s.listening_document() else {
        return (Disposition::Continue, pending);
      };
      match resolve_target::<D>(&doc, target) {
        Some(element) if !is_structural::<D>(&doc, &element) => {
          s.select(element, describer, &mut pending);
        }
        Some(_) | None => log::debug!("Click on body, root or non-element target ignored"),
      }
      (Disposition::Suppress, pending)
    });
    self.deliver(pending);
    disposition
  }
}
