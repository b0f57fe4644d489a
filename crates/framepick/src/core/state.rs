/*!
Bridge state and marker bookkeeping.

Every mutation that the host should hear about pushes a `BridgeEvent` onto
`Pending`; the caller delivers them after releasing the state borrow, so
callbacks can re-enter the bridge.

## Invariants

1. At most one hovered and one selected element; the previous marker is
   removed before the next is applied.
2. `attached.is_some()` iff the bridge is enabled.
3. `last_error` is `None` iff the last resolution produced a document.
*/

use crate::describe::Describer;
use crate::markers::Markers;
use crate::platform::{DocumentAccess, Dom, ElementHandle};
use crate::types::{BridgeError, BridgeEvent};

/// Events produced while the state was borrowed, delivered afterwards.
#[derive(Debug, Default)]
pub(crate) struct Pending(pub(super) Vec<BridgeEvent>);

impl Pending {
  pub(super) fn push(&mut self, event: BridgeEvent) {
    self.0.push(event);
  }
}

/// Listeners attached to one document. Dropping detaches them.
pub(super) struct Attached<D: Dom> {
  pub(super) document: D::Document,
  _listeners: D::Listeners,
}

pub(crate) struct BridgeState<D: Dom> {
  pub(super) frame: Option<D::Frame>,
  pub(super) document: Option<D::Document>,
  pub(super) attached: Option<Attached<D>>,
  pub(super) hovered: Option<D::Element>,
  pub(super) selected: Option<D::Element>,
  pub(super) last_error: BridgeError,
}

impl<D: Dom> BridgeState<D> {
  pub(super) const fn new() -> Self {
    Self {
      frame: None,
      document: None,
      attached: None,
      hovered: None,
      selected: None,
      last_error: BridgeError::None,
    }
  }

  pub(super) const fn is_enabled(&self) -> bool {
    self.attached.is_some()
  }

  /// Document the listeners are attached to, if enabled.
  pub(super) fn listening_document(&self) -> Option<D::Document> {
    self.attached.as_ref().map(|a| a.document.clone())
  }

  pub(super) fn attach(&mut self, document: D::Document, listeners: D::Listeners) {
    self.attached = Some(Attached {
      document,
      _listeners: listeners,
    });
  }

  /// Re-derive the document from the bound frame and record the outcome.
  pub(super) fn resolve_document(&mut self, pending: &mut Pending) {
    let (document, error) = match &self.frame {
      None => (None, BridgeError::NoIframe),
      Some(frame) => match D::content_document(frame) {
        DocumentAccess::Ready(doc) => (Some(doc), BridgeError::None),
        DocumentAccess::NotReady => (None, BridgeError::NotReady),
        DocumentAccess::Denied => {
          log::warn!("Cross-origin iframe, element picking unavailable");
          (None, BridgeError::CrossOrigin)
        }
      },
    };
    self.document = document;
    self.set_error(error, pending);
  }

  pub(super) fn set_error(&mut self, error: BridgeError, pending: &mut Pending) {
    if self.last_error != error {
      self.last_error = error;
      pending.push(BridgeEvent::StatusChanged { error });
    }
  }

  /// Drop listeners (if any) and the hover marker.
  pub(super) fn detach(&mut self, markers: &Markers, pending: &mut Pending) {
    if self.attached.take().is_some() {
      log::debug!("Listeners detached");
      pending.push(BridgeEvent::Disabled);
    }
    self.clear_hover(markers, pending);
  }

  pub(super) fn clear_hover(&mut self, markers: &Markers, pending: &mut Pending) {
    if let Some(element) = self.hovered.take() {
      element.remove_marker(&markers.hover_class);
      pending.push(BridgeEvent::HoverChanged { path: None });
    }
  }

  pub(super) fn set_hover(
    &mut self,
    element: D::Element,
    describer: &Describer,
    pending: &mut Pending,
  ) {
    if self.hovered.as_ref() == Some(&element) {
      return;
    }
    if let Some(previous) = self.hovered.take() {
      previous.remove_marker(&describer.markers.hover_class);
    }
    element.add_marker(&describer.markers.hover_class);
    pending.push(BridgeEvent::HoverChanged {
      path: Some(describer.path(&element)),
    });
    self.hovered = Some(element);
  }

  /// Remove the selection marker. Notification is the caller's call.
  pub(super) fn clear_selected(&mut self, markers: &Markers) {
    if let Some(element) = self.selected.take() {
      element.remove_marker(&markers.selected_class);
    }
  }

  pub(super) fn select(&mut self, element: D::Element, describer: &Describer, pending: &mut Pending) {
    self.clear_selected(&describer.markers);
    element.add_marker(&describer.markers.selected_class);
    let descriptor = describer.describe(&element);
    log::debug!("Selected {}", descriptor.path);
    pending.push(BridgeEvent::SelectionChanged {
      element: Some(descriptor),
    });
    self.selected = Some(element);
  }

  /// Remove every marker without notifying anyone.
  pub(super) fn strip_markers(&mut self, markers: &Markers) {
    if let Some(element) = self.hovered.take() {
      element.remove_marker(&markers.hover_class);
    }
    self.clear_selected(markers);
  }
}
