/*! Bridge configuration. */

use std::marker::PhantomData;

use crate::core::{Bridge, SelectionCallback};
use crate::describe::{Describer, DEFAULT_PATH_CLASS_LIMIT, DEFAULT_TEXT_LIMIT};
use crate::markers::Markers;
use crate::platform::Dom;
use crate::types::{FramepickError, FramepickResult, SelectedElement};

/// Default capacity of the event channel returned by `Bridge::subscribe`.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;

/// Builder for configuring a bridge.
///
/// # Example
///
/// ```
/// use framepick::headless::HeadlessDom;
/// use framepick::Bridge;
///
/// let bridge = Bridge::<HeadlessDom>::builder()
///     .on_selection_change(|selection| println!("{selection:?}"))
///     .hover_class("picker-hover")
///     .selected_class("picker-selected")
///     .text_limit(80)
///     .build()?;
/// assert!(!bridge.is_enabled());
/// # Ok::<(), framepick::FramepickError>(())
/// ```
#[must_use = "Builder does nothing until .build() is called"]
pub struct BridgeBuilder<D: Dom> {
  on_selection_change: Option<SelectionCallback>,
  describer: Describer,
  event_channel_capacity: usize,
  _dom: PhantomData<D>,
}

impl<D: Dom> std::fmt::Debug for BridgeBuilder<D> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BridgeBuilder")
      .field("markers", &self.describer.markers)
      .field("text_limit", &self.describer.text_limit)
      .field("path_class_limit", &self.describer.path_class_limit)
      .field("event_channel_capacity", &self.event_channel_capacity)
      .finish_non_exhaustive()
  }
}

impl<D: Dom> Default for BridgeBuilder<D> {
  fn default() -> Self {
    Self {
      on_selection_change: None,
      describer: Describer::default(),
      event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
      _dom: PhantomData,
    }
  }
}

impl<D: Dom> BridgeBuilder<D> {
  /// Called with a descriptor on every selection, and with `None` whenever the
  /// selection is cleared.
  ///
  /// The callback may call back into the bridge. It must not own a clone of
  /// the bridge, or the bridge is never dropped.
  pub fn on_selection_change(mut self, callback: impl Fn(Option<SelectedElement>) + 'static) -> Self {
    self.on_selection_change = Some(Box::new(callback));
    self
  }

  /// Id of the injected `<style>` element. Default: `visual-editor-style`.
  pub fn style_id(mut self, id: impl Into<String>) -> Self {
    self.describer.markers.style_id = id.into();
    self
  }

  /// Class marking the hovered element. Default: `visual-editor-hovered`.
  pub fn hover_class(mut self, class: impl Into<String>) -> Self {
    self.describer.markers.hover_class = class.into();
    self
  }

  /// Class marking the selected element. Default: `visual-editor-selected`.
  pub fn selected_class(mut self, class: impl Into<String>) -> Self {
    self.describer.markers.selected_class = class.into();
    self
  }

  /// Maximum characters of text in a descriptor. Default: 200.
  pub fn text_limit(mut self, limit: usize) -> Self {
    self.describer.text_limit = limit;
    self
  }

  /// Class names kept per path segment. Default: 2.
  pub fn path_class_limit(mut self, limit: usize) -> Self {
    self.describer.path_class_limit = limit;
    self
  }

  /// Capacity of the event channel. Oldest events are dropped when full. Default: 256.
  pub fn event_channel_capacity(mut self, capacity: usize) -> Self {
    self.event_channel_capacity = capacity;
    self
  }

  /// Validate the configuration and build an unbound, disabled bridge.
  pub fn build(self) -> FramepickResult<Bridge<D>> {
    self.describer.markers.validate()?;
    if self.describer.text_limit == 0 {
      return Err(FramepickError::InvalidConfig(
        "text limit must be at least 1".into(),
      ));
    }
    if self.event_channel_capacity == 0 {
      return Err(FramepickError::InvalidConfig(
        "event channel capacity must be at least 1".into(),
      ));
    }
    Ok(Bridge::create(
      self.describer,
      self.on_selection_change,
      self.event_channel_capacity,
    ))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::headless::HeadlessDom;

  #[test]
  fn defaults_build() {
    let bridge = BridgeBuilder::<HeadlessDom>::default().build().unwrap();
    assert_eq!(bridge.markers().style_id(), "visual-editor-style");
    assert_eq!(bridge.markers().hover_class(), "visual-editor-hovered");
    assert_eq!(bridge.markers().selected_class(), "visual-editor-selected");
  }

  #[test]
  fn rejects_invalid_configuration() {
    let same = BridgeBuilder::<HeadlessDom>::default()
      .hover_class("pick")
      .selected_class("pick")
      .build();
    assert!(matches!(same, Err(FramepickError::InvalidConfig(_))));

    let zero_text = BridgeBuilder::<HeadlessDom>::default().text_limit(0).build();
    assert!(zero_text.is_err());

    let zero_channel = BridgeBuilder::<HeadlessDom>::default()
      .event_channel_capacity(0)
      .build();
    assert!(zero_channel.is_err());

    let spaced = BridgeBuilder::<HeadlessDom>::default().style_id("a b").build();
    assert!(spaced.is_err());
  }
}
