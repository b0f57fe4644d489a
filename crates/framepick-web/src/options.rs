/*!
Host-facing option and payload handling, independent of the JS runtime.
*/

use framepick::{BridgeBuilder, Dom, SelectedElement};

/// Options a JS host passes besides the selection callback.
///
/// Unset fields keep the bridge defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeOptions {
  /// Id of the injected `<style>` element.
  pub style_id: Option<String>,
  /// Class marking the hovered element.
  pub hover_class: Option<String>,
  /// Class marking the selected element.
  pub selected_class: Option<String>,
  /// Maximum characters of descriptor text.
  pub text_limit: Option<usize>,
}

impl BridgeOptions {
  /// Apply the set fields to `builder`.
  pub fn configure<D: Dom>(self, mut builder: BridgeBuilder<D>) -> BridgeBuilder<D> {
    if let Some(id) = self.style_id {
      builder = builder.style_id(id);
    }
    if let Some(class) = self.hover_class {
      builder = builder.hover_class(class);
    }
    if let Some(class) = self.selected_class {
      builder = builder.selected_class(class);
    }
    if let Some(limit) = self.text_limit {
      builder = builder.text_limit(limit);
    }
    builder
  }
}

/// JSON for a selection callback argument: the descriptor, or `null`.
pub fn selection_json(selection: Option<&SelectedElement>) -> String {
  match selection.map(serde_json::to_string) {
    Some(Ok(json)) => json,
    Some(Err(e)) => {
      log::error!("Failed to serialize selection: {e}");
      "null".to_string()
    }
    None => "null".to_string(),
  }
}

/// Parse a console log level name. Unknown names yield `None`.
pub fn parse_level(level: &str) -> Option<log::LevelFilter> {
  level.trim().parse().ok()
}
