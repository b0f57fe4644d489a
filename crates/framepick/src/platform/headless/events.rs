/*!
Listener registration and event dispatch for headless documents.

Every listener is a capture-phase listener on the document, so dispatch is a
single pass over the registrations for the event kind. Sinks are collected
before any of them runs: a sink may mutate the tree or drop its own listeners.
*/

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::tree::{Document, Node, Tree};
use crate::platform::{Disposition, EventSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum EventKind {
  PointerMove,
  PointerOut,
  Click,
}

pub(super) struct Registration {
  id: u64,
  kind: EventKind,
  sink: Rc<dyn EventSink<Node>>,
}

/// What happened to a dispatched click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
  /// A listener called `preventDefault`.
  pub default_prevented: bool,
  /// A listener called `stopPropagation`; the page's own handlers never ran.
  pub propagation_stopped: bool,
}

impl DispatchOutcome {
  /// Whether the click reached the page's own handlers.
  pub const fn reached_page(&self) -> bool {
    !self.propagation_stopped
  }
}

/// Capture listeners on a headless document. Detaches on drop.
pub struct Listeners {
  tree: Weak<RefCell<Tree>>,
  id: u64,
}

impl std::fmt::Debug for Listeners {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Listeners").field("id", &self.id).finish()
  }
}

impl Drop for Listeners {
  fn drop(&mut self) {
    if let Some(tree) = self.tree.upgrade() {
      tree.borrow_mut().listeners.retain(|r| r.id != self.id);
    }
  }
}

/// Register one sink for pointer-move, pointer-out and click.
pub(super) fn register(doc: &Document, sink: Rc<dyn EventSink<Node>>) -> Listeners {
  let id = doc.write(|t| {
    let id = t.next_listener;
    t.next_listener += 1;
    for kind in [EventKind::PointerMove, EventKind::PointerOut, EventKind::Click] {
      t.listeners.push(Registration {
        id,
        kind,
        sink: Rc::clone(&sink),
      });
    }
    id
  });
  Listeners {
    tree: Rc::downgrade(&doc.tree),
    id,
  }
}

impl Document {
  fn sinks(&self, kind: EventKind) -> Vec<Rc<dyn EventSink<Node>>> {
    self.read(|t| {
      t.listeners
        .iter()
        .filter(|r| r.kind == kind)
        .map(|r| Rc::clone(&r.sink))
        .collect()
    })
  }

  /// Number of registered listeners, one per event type per registration.
  pub fn listener_count(&self) -> usize {
    self.read(|t| t.listeners.len())
  }

  /// Dispatch a `mousemove` at `target`.
  pub fn pointer_move(&self, target: &Node) {
    for sink in self.sinks(EventKind::PointerMove) {
      sink.pointer_moved(Some(target.clone()));
    }
  }

  /// Dispatch a `mouseout` whose `relatedTarget` is `related`.
  ///
  /// `None` models the pointer leaving the document entirely.
  pub fn pointer_out(&self, related: Option<&Node>) {
    for sink in self.sinks(EventKind::PointerOut) {
      sink.pointer_left(related.cloned());
    }
  }

  /// Dispatch a `click` at `target`.
  ///
  /// Stopping propagation does not skip other capture listeners on the
  /// document itself, only the page's handlers further down.
  pub fn click(&self, target: &Node) -> DispatchOutcome {
    let mut outcome = DispatchOutcome::default();
    for sink in self.sinks(EventKind::Click) {
      if sink.clicked(Some(target.clone())) == Disposition::Suppress {
        outcome.default_prevented = true;
        outcome.propagation_stopped = true;
      }
    }
    outcome
  }
}
