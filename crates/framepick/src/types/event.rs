/*! Events emitted when bridge state changes. */

use super::{BridgeError, SelectedElement};
use serde::Serialize;
use ts_rs::TS;

/// Events broadcast to subscribers of a bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "event", content = "data")]
#[ts(export)]
pub enum BridgeEvent {
  // Selection (from clicks, clear_selection, frame swaps)
  #[serde(rename = "selection:changed")]
  SelectionChanged { element: Option<SelectedElement> },

  // Hover marker moved or cleared
  #[serde(rename = "hover:changed")]
  HoverChanged { path: Option<String> },

  // Listener lifecycle
  #[serde(rename = "bridge:enabled")]
  Enabled,
  #[serde(rename = "bridge:disabled")]
  Disabled,

  // Document access outcome changed
  #[serde(rename = "status:changed")]
  StatusChanged { error: BridgeError },
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn events_are_adjacently_tagged() {
    let cleared = BridgeEvent::SelectionChanged { element: None };
    assert_eq!(
      serde_json::to_string(&cleared).unwrap(),
      r#"{"event":"selection:changed","data":{"element":null}}"#
    );

    let status = BridgeEvent::StatusChanged {
      error: BridgeError::CrossOrigin,
    };
    assert_eq!(
      serde_json::to_string(&status).unwrap(),
      r#"{"event":"status:changed","data":{"error":"cross-origin"}}"#
    );

    assert_eq!(
      serde_json::to_string(&BridgeEvent::Enabled).unwrap(),
      r#"{"event":"bridge:enabled"}"#
    );
  }
}
