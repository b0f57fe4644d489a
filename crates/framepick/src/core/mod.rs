/*!
Core bridge - owns the frame binding, marker state and event delivery.

# Module Structure

- `mod.rs` - Bridge struct, construction, public operations, delivery
- `state.rs` - `BridgeState` fields and marker bookkeeping
- `handlers.rs` - pointer/click handlers called by platform listeners

# Example

```ignore
let bridge = Bridge::<WebDom>::new(|selection| render_inspector(selection));

bridge.set_frame(Some(iframe));
if !bridge.enable() {
    // not-ready: retry on the iframe's load event
    // cross-origin: picking is unavailable for this frame
    show_status(bridge.last_error());
}
```
*/

mod handlers;
mod state;

use std::cell::RefCell;
use std::rc::Rc;

use async_broadcast::{InactiveReceiver, Receiver, Sender};

use crate::config::{BridgeBuilder, DEFAULT_EVENT_CHANNEL_CAPACITY};
use crate::describe::Describer;
use crate::markers::Markers;
use crate::platform::{Dom, EventSink};
use crate::types::{BridgeError, BridgeEvent, SelectedElement};
use handlers::Sink;
use state::{BridgeState, Pending};

/// Selection-change callback: a descriptor on selection, `None` when cleared.
pub type SelectionCallback = Box<dyn Fn(Option<SelectedElement>)>;

pub(crate) struct Shared<D: Dom> {
  state: RefCell<BridgeState<D>>,
  describer: Describer,
  on_selection_change: Option<SelectionCallback>,
  events_tx: Sender<BridgeEvent>,
  events_keepalive: InactiveReceiver<BridgeEvent>,
}

impl<D: Dom> Shared<D> {
  /// Read state. Never run host callbacks inside the closure.
  #[inline]
  fn read<R>(&self, f: impl FnOnce(&BridgeState<D>, &Describer) -> R) -> R {
    f(&self.state.borrow(), &self.describer)
  }

  /// Write state. Never run host callbacks inside the closure.
  #[inline]
  fn write<R>(&self, f: impl FnOnce(&mut BridgeState<D>, &Describer) -> R) -> R {
    f(&mut self.state.borrow_mut(), &self.describer)
  }

  fn emit(&self, event: BridgeEvent) {
    if let Err(e) = self.events_tx.try_broadcast(event) {
      if e.is_full() {
        log::error!(
          "Event channel overflow - events are being dropped. \
           Consider increasing event_channel_capacity or processing events faster."
        );
      }
    }
  }

  /// Broadcast pending events and run the selection callback, in order.
  fn deliver(&self, pending: Pending) {
    for event in pending.0 {
      let selection = match &event {
        BridgeEvent::SelectionChanged { element } => Some(element.clone()),
        BridgeEvent::HoverChanged { .. }
        | BridgeEvent::Enabled
        | BridgeEvent::Disabled
        | BridgeEvent::StatusChanged { .. } => None,
      };
      self.emit(event);
      if let (Some(element), Some(callback)) = (selection, &self.on_selection_change) {
        callback(element);
      }
    }
  }
}

impl<D: Dom> Drop for Shared<D> {
  fn drop(&mut self) {
    // Listeners detach when `attached` drops; markers need explicit removal
    let markers = &self.describer.markers;
    self.state.get_mut().strip_markers(markers);
  }
}

/// Element-picking bridge for one embedded frame.
///
/// Clone is cheap (`Rc` bump) and clones share state. Dropping the last clone
/// detaches listeners and removes markers without notifying the callback.
pub struct Bridge<D: Dom> {
  shared: Rc<Shared<D>>,
}

impl<D: Dom> Clone for Bridge<D> {
  fn clone(&self) -> Self {
    Self {
      shared: Rc::clone(&self.shared),
    }
  }
}

impl<D: Dom> std::fmt::Debug for Bridge<D> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Bridge").finish_non_exhaustive()
  }
}

impl<D: Dom> Bridge<D> {
  /// Create an unbound, disabled bridge with default options.
  pub fn new(on_selection_change: impl Fn(Option<SelectedElement>) + 'static) -> Self {
    Self::create(
      Describer::default(),
      Some(Box::new(on_selection_change)),
      DEFAULT_EVENT_CHANNEL_CAPACITY,
    )
  }

  /// Create a builder for configuring a new bridge.
  pub fn builder() -> BridgeBuilder<D> {
    BridgeBuilder::default()
  }

  pub(crate) fn create(
    describer: Describer,
    on_selection_change: Option<SelectionCallback>,
    event_channel_capacity: usize,
  ) -> Self {
    let (mut tx, rx) = async_broadcast::broadcast(event_channel_capacity);
    tx.set_overflow(true); // Drop oldest events when full

    Self {
      shared: Rc::new(Shared {
        state: RefCell::new(BridgeState::new()),
        describer,
        on_selection_change,
        events_tx: tx,
        events_keepalive: rx.deactivate(),
      }),
    }
  }

  /// Subscribe to bridge events.
  pub fn subscribe(&self) -> Receiver<BridgeEvent> {
    self.shared.events_keepalive.activate_cloned()
  }

  /// Bind a frame (or unbind with `None`).
  ///
  /// Passing the currently bound frame again does nothing. Otherwise listeners
  /// are detached, the selection is cleared (notifying the callback), and the
  /// new frame's document is resolved. Call `enable()` again afterwards.
  pub fn set_frame(&self, frame: Option<D::Frame>) {
    let pending = self.shared.write(|s, describer| {
      let mut pending = Pending::default();
      if s.frame == frame {
        return pending;
      }
      s.detach(&describer.markers, &mut pending);
      s.clear_selected(&describer.markers);
      pending.push(BridgeEvent::SelectionChanged { element: None });
      s.frame = frame;
      s.resolve_document(&mut pending);
      log::debug!("Frame bound, document status: {}", s.last_error);
      pending
    });
    self.shared.deliver(pending);
  }

  /// Start picking. Returns true iff listeners are attached.
  ///
  /// The document is resolved again on every call, so a frame that finished
  /// loading after `set_frame` is picked up. On failure the bridge stays
  /// disabled and `last_error()` tells why.
  pub fn enable(&self) -> bool {
    let sink: Rc<dyn EventSink<D::Node>> = Rc::new(Sink {
      shared: Rc::downgrade(&self.shared),
    });

    let (enabled, pending) = self.shared.write(|s, describer| {
      let mut pending = Pending::default();
      s.resolve_document(&mut pending);

      let Some(document) = s.document.clone() else {
        s.detach(&describer.markers, &mut pending);
        log::debug!("Enable failed: {}", s.last_error);
        return (false, pending);
      };

      // The page may have removed the stylesheet since the last enable
      match describer.markers.inject::<D>(&document) {
        Ok(true) => log::debug!("Injected marker stylesheet"),
        Ok(false) => {}
        Err(e) => log::warn!("{e}; markers will not be visible"),
      }

      if s.listening_document().as_ref() == Some(&document) {
        return (true, pending);
      }
      s.detach(&describer.markers, &mut pending);

      match D::listen(&document, sink) {
        Ok(listeners) => {
          s.attach(document, listeners);
          s.set_error(BridgeError::None, &mut pending);
          pending.push(BridgeEvent::Enabled);
          log::debug!("Listeners attached");
          (true, pending)
        }
        Err(e) => {
          log::warn!("Enable failed: {e}");
          (false, pending)
        }
      }
    });

    self.shared.deliver(pending);
    enabled
  }

  /// Stop picking: detach listeners and clear the hover marker.
  /// The selection is kept. No-op when already disabled.
  pub fn disable(&self) {
    let pending = self.shared.write(|s, describer| {
      let mut pending = Pending::default();
      s.detach(&describer.markers, &mut pending);
      pending
    });
    self.shared.deliver(pending);
  }

  /// Remove the selection marker and notify the callback with `None`.
  pub fn clear_selection(&self) {
    let pending = self.shared.write(|s, describer| {
      let mut pending = Pending::default();
      s.clear_selected(&describer.markers);
      pending.push(BridgeEvent::SelectionChanged { element: None });
      pending
    });
    self.shared.deliver(pending);
  }

  /// Disable, clear the selection and release the frame.
  ///
  /// The bridge should not be used afterwards.
  pub fn destroy(&self) {
    let pending = self.shared.write(|s, describer| {
      let mut pending = Pending::default();
      s.detach(&describer.markers, &mut pending);
      s.clear_selected(&describer.markers);
      pending.push(BridgeEvent::SelectionChanged { element: None });
      s.frame = None;
      s.document = None;
      s.set_error(BridgeError::None, &mut pending);
      pending
    });
    self.shared.deliver(pending);
  }

  /// Outcome of the most recent document resolution.
  pub fn last_error(&self) -> BridgeError {
    self.shared.read(|s, _| s.last_error)
  }

  /// Whether listeners are attached.
  pub fn is_enabled(&self) -> bool {
    self.shared.read(|s, _| s.is_enabled())
  }

  /// Whether a frame is bound.
  pub fn has_frame(&self) -> bool {
    self.shared.read(|s, _| s.frame.is_some())
  }

  /// Fresh descriptor of the current selection.
  pub fn selected(&self) -> Option<SelectedElement> {
    self
      .shared
      .read(|s, describer| s.selected.as_ref().map(|e| describer.describe(e)))
  }

  /// Structural path of the hovered element.
  pub fn hovered_path(&self) -> Option<String> {
    self
      .shared
      .read(|s, describer| s.hovered.as_ref().map(|e| describer.path(e)))
  }

  /// Marker names and stylesheet in use.
  pub fn markers(&self) -> &Markers {
    &self.shared.describer.markers
  }
}
