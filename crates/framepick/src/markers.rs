/*!
Marker classes and the stylesheet that makes them visible.

The bridge only touches the embedded document through these: one `<style>`
element in the head and two classes toggled on at most one element each.
*/

use crate::platform::Dom;
use crate::types::{FramepickError, FramepickResult};

/// Id of the injected `<style>` element.
pub const DEFAULT_STYLE_ID: &str = "visual-editor-style";
/// Class applied to the hovered element.
pub const DEFAULT_HOVER_CLASS: &str = "visual-editor-hovered";
/// Class applied to the selected element.
pub const DEFAULT_SELECTED_CLASS: &str = "visual-editor-selected";

const HOVER_OUTLINE: &str = "2px dashed #1677ff";
const SELECTED_OUTLINE: &str = "2px solid #fa541c";

/// Names of the injected stylesheet and marker classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
  pub(crate) style_id: String,
  pub(crate) hover_class: String,
  pub(crate) selected_class: String,
}

impl Default for Markers {
  fn default() -> Self {
    Self {
      style_id: DEFAULT_STYLE_ID.to_string(),
      hover_class: DEFAULT_HOVER_CLASS.to_string(),
      selected_class: DEFAULT_SELECTED_CLASS.to_string(),
    }
  }
}

impl Markers {
  /// Id of the injected `<style>` element.
  pub fn style_id(&self) -> &str {
    &self.style_id
  }

  /// Class on the hovered element.
  pub fn hover_class(&self) -> &str {
    &self.hover_class
  }

  /// Class on the selected element.
  pub fn selected_class(&self) -> &str {
    &self.selected_class
  }

  /// Whether `class` is one of the bridge's own marker classes.
  pub fn is_marker(&self, class: &str) -> bool {
    class == self.hover_class || class == self.selected_class
  }

  /// CSS for both markers. Outlines are inset so they never shift layout.
  pub fn stylesheet(&self) -> String {
    format!(
      "\n.{hover} {{\n  outline: {HOVER_OUTLINE} !important;\n  cursor: crosshair !important;\n  outline-offset: -2px !important;\n}}\n\
       .{selected} {{\n  outline: {SELECTED_OUTLINE} !important;\n  cursor: crosshair !important;\n  outline-offset: -2px !important;\n}}\n",
      hover = self.hover_class,
      selected = self.selected_class,
    )
  }

  /// Inject the stylesheet unless an element with the style id already exists.
  ///
  /// Returns whether a new `<style>` was inserted.
  pub(crate) fn inject<D: Dom>(&self, doc: &D::Document) -> FramepickResult<bool> {
    if D::contains_id(doc, &self.style_id) {
      return Ok(false);
    }
    D::insert_style(doc, &self.style_id, &self.stylesheet())?;
    Ok(true)
  }

  pub(crate) fn validate(&self) -> FramepickResult<()> {
    for (what, value) in [
      ("style id", &self.style_id),
      ("hover class", &self.hover_class),
      ("selected class", &self.selected_class),
    ] {
      if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(FramepickError::InvalidConfig(format!(
          "{what} must be a non-empty token without whitespace, got {value:?}"
        )));
      }
    }
    if self.hover_class == self.selected_class {
      return Err(FramepickError::InvalidConfig(
        "hover and selected classes must differ".into(),
      ));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::headless::{Document, HeadlessDom};
  use crate::platform::ElementHandle;

  #[test]
  fn stylesheet_defines_both_markers_with_inset_outlines() {
    let css = Markers::default().stylesheet();
    assert!(css.contains(".visual-editor-hovered {"));
    assert!(css.contains(".visual-editor-selected {"));
    assert!(css.contains("2px dashed"));
    assert!(css.contains("2px solid"));
    assert_eq!(css.matches("outline-offset: -2px").count(), 2);
    assert_eq!(css.matches("cursor: crosshair").count(), 2);
  }

  #[test]
  fn inject_is_idempotent() {
    let doc = Document::new();
    let markers = Markers::default();

    assert!(markers.inject::<HeadlessDom>(&doc).unwrap());
    assert!(!markers.inject::<HeadlessDom>(&doc).unwrap());

    let styles = doc
      .head()
      .fetch_children()
      .into_iter()
      .filter(|e| e.tag_name() == "STYLE")
      .count();
    assert_eq!(styles, 1);
  }

  #[test]
  fn validate_rejects_bad_names() {
    let mut markers = Markers::default();
    markers.hover_class = "two words".into();
    assert!(markers.validate().is_err());

    let mut markers = Markers::default();
    markers.selected_class = markers.hover_class.clone();
    assert!(markers.validate().is_err());

    let mut markers = Markers::default();
    markers.style_id = String::new();
    assert!(markers.validate().is_err());

    assert!(Markers::default().validate().is_ok());
  }
}
