/*!
Descriptor construction for selected elements.

- text: rendered text, whitespace collapsed, truncated with `…`
- attributes: snapshot in element order
- path: `tag#id` anchor or `tag.class1.class2:nth-of-type(n)` segments,
  root-to-leaf, joined with `" > "`

The bridge's own marker classes never leak into a descriptor.
*/

use std::fmt::Write as _;

use crate::markers::Markers;
use crate::platform::ElementHandle;
use crate::types::SelectedElement;

/// Maximum characters of text kept in a descriptor.
pub const DEFAULT_TEXT_LIMIT: usize = 200;
/// Class names kept per path segment.
pub const DEFAULT_PATH_CLASS_LIMIT: usize = 2;

const ELLIPSIS: char = '\u{2026}';
const PATH_SEPARATOR: &str = " > ";

/// Collapse whitespace runs to one space, trim, and truncate to `limit`
/// characters with a trailing `…` when longer.
///
/// ```
/// use framepick::normalize_text;
///
/// assert_eq!(normalize_text("  Hello \n\t world  ", 200), "Hello world");
/// assert_eq!(normalize_text("abcdef", 3), "abc…");
/// ```
pub fn normalize_text(raw: &str, limit: usize) -> String {
  let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
  if collapsed.chars().count() <= limit {
    return collapsed;
  }
  let mut truncated: String = collapsed.chars().take(limit).collect();
  truncated.push(ELLIPSIS);
  truncated
}

/// Builds descriptors and paths with the bridge's configuration.
#[derive(Debug, Clone)]
pub(crate) struct Describer {
  pub(crate) markers: Markers,
  pub(crate) text_limit: usize,
  pub(crate) path_class_limit: usize,
}

impl Default for Describer {
  fn default() -> Self {
    Self {
      markers: Markers::default(),
      text_limit: DEFAULT_TEXT_LIMIT,
      path_class_limit: DEFAULT_PATH_CLASS_LIMIT,
    }
  }
}

impl Describer {
  /// Snapshot `element` into a fresh descriptor.
  pub(crate) fn describe<E: ElementHandle>(&self, element: &E) -> SelectedElement {
    let id = element.fetch_id();
    let raw_class_name = element.fetch_class_name();
    let class_name = self.without_markers(&raw_class_name);
    let class_name = (!class_name.is_empty() && !only_markers(&raw_class_name, &class_name))
      .then_some(class_name);

    let attributes = element
      .fetch_attributes()
      .into_iter()
      .filter_map(|(name, value)| {
        if name != "class" {
          return Some((name, value));
        }
        let stripped = self.without_markers(&value);
        (!only_markers(&value, &stripped)).then_some((name, stripped))
      })
      .collect();

    SelectedElement {
      tag_name: element.fetch_tag().to_lowercase(),
      id: (!id.is_empty()).then_some(id),
      class_name,
      text_content: normalize_text(&element.fetch_text(), self.text_limit),
      path: self.path(element),
      attributes,
    }
  }

  /// Structural path from the nearest id-anchored ancestor (or the root) down to `element`.
  pub(crate) fn path<E: ElementHandle>(&self, element: &E) -> String {
    let mut segments = Vec::new();
    let mut current = Some(element.clone());

    while let Some(node) = current {
      let tag = node.fetch_tag();
      let lower = tag.to_lowercase();
      let id = node.fetch_id();
      if !id.is_empty() {
        segments.push(format!("{lower}#{id}"));
        break;
      }

      let mut segment = lower;
      let classes: Vec<String> = node
        .fetch_classes()
        .into_iter()
        .filter(|c| !self.markers.is_marker(c))
        .take(self.path_class_limit)
        .collect();
      if !classes.is_empty() {
        segment.push('.');
        segment.push_str(&classes.join("."));
      }

      let parent = node.fetch_parent();
      if let Some(parent) = &parent {
        let same_tag: Vec<E> = parent
          .fetch_children()
          .into_iter()
          .filter(|c| c.fetch_tag() == tag)
          .collect();
        if same_tag.len() > 1 {
          if let Some(position) = same_tag.iter().position(|c| *c == node) {
            drop(write!(segment, ":nth-of-type({})", position + 1));
          }
        }
      }

      segments.push(segment);
      current = parent;
    }

    segments.reverse();
    segments.join(PATH_SEPARATOR)
  }

  /// Class string with marker tokens spliced out. Everything else, including
  /// the original spacing, is kept as the element reports it.
  fn without_markers(&self, class_name: &str) -> String {
    let mut out = String::with_capacity(class_name.len());
    let mut rest = class_name;
    let mut kept_any = false;
    let mut skip_gap = false;

    while !rest.is_empty() {
      let start = rest.find(|c: char| !c.is_whitespace()).unwrap_or(rest.len());
      let (gap, after) = rest.split_at(start);
      let end = after.find(char::is_whitespace).unwrap_or(after.len());
      let (token, tail) = after.split_at(end);
      rest = tail;

      if !token.is_empty() && self.markers.is_marker(token) {
        // A marker takes the gap before it, or the gap after it when leading
        if !kept_any {
          if !skip_gap {
            out.push_str(gap);
          }
          skip_gap = true;
        }
        continue;
      }
      if !skip_gap {
        out.push_str(gap);
      }
      skip_gap = false;
      kept_any |= !token.is_empty();
      out.push_str(token);
    }
    out
  }
}

/// A class string that only ever held marker tokens.
fn only_markers(raw: &str, stripped: &str) -> bool {
  stripped != raw && stripped.split_whitespace().next().is_none()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::headless::{Document, Element};

  fn div(doc: &Document) -> Element {
    doc.create_element("div")
  }

  #[test]
  fn path_stops_at_id_and_keeps_two_classes() {
    let doc = Document::new();
    let root = doc.body().append(div(&doc).with_attribute("id", "root"));
    let section = root.append(doc.create_element("section"));
    let span = section.append(doc.create_element("span").with_attribute("class", "a b c"));

    assert_eq!(
      Describer::default().path(&span),
      "div#root > section > span.a.b"
    );
  }

  #[test]
  fn path_without_ids_reaches_the_root() {
    let doc = Document::new();
    let p = doc.body().append(doc.create_element("p"));
    assert_eq!(Describer::default().path(&p), "html > body > p");
  }

  #[test]
  fn path_indexes_same_tag_siblings_only() {
    let doc = Document::new();
    let list = doc.body().append(doc.create_element("ul").with_attribute("id", "menu"));
    let _first = list.append(doc.create_element("li"));
    let second = list.append(doc.create_element("li"));
    let label = list.append(doc.create_element("span"));

    let describer = Describer::default();
    assert_eq!(describer.path(&second), "ul#menu > li:nth-of-type(2)");
    assert_eq!(describer.path(&label), "ul#menu > span");
  }

  #[test]
  fn element_with_id_is_its_own_anchor() {
    let doc = Document::new();
    let hero = doc
      .body()
      .append(doc.create_element("h1").with_attribute("id", "hero"));
    assert_eq!(Describer::default().path(&hero), "h1#hero");
  }

  #[test]
  fn long_text_is_truncated_to_limit_plus_ellipsis() {
    let raw = "x".repeat(250);
    let text = normalize_text(&raw, DEFAULT_TEXT_LIMIT);
    assert_eq!(text.chars().count(), 201);
    assert!(text.ends_with('\u{2026}'));
    assert!(text.starts_with(&"x".repeat(200)));
  }

  #[test]
  fn text_at_limit_is_kept_whole() {
    let raw = "y".repeat(200);
    assert_eq!(normalize_text(&raw, DEFAULT_TEXT_LIMIT), raw);
  }

  #[test]
  fn describe_snapshots_element_without_markers() {
    let doc = Document::new();
    let link = doc.body().append(
      doc
        .create_element("a")
        .with_attribute("href", "/docs")
        .with_attribute("class", "nav primary"),
    );
    link.append_text("  Read\n  the docs ");

    let describer = Describer::default();
    link.add_marker(describer.markers.hover_class());
    link.add_marker(describer.markers.selected_class());

    let descriptor = describer.describe(&link);
    assert_eq!(descriptor.tag_name, "a");
    assert_eq!(descriptor.id, None);
    assert_eq!(descriptor.class_name.as_deref(), Some("nav primary"));
    assert_eq!(descriptor.text_content, "Read the docs");
    assert_eq!(descriptor.path, "html > body > a.nav.primary");
    assert_eq!(
      descriptor.attributes.iter().collect::<Vec<_>>(),
      vec![("href", "/docs"), ("class", "nav primary")]
    );
  }

  #[test]
  fn class_spacing_does_not_depend_on_markers() {
    let doc = Document::new();
    let describer = Describer::default();
    let hover = describer.markers.hover_class().to_string();

    for (raw, with_marker) in [
      ("a  b", format!("a {hover}  b")),
      ("a  b", format!("{hover} a  b")),
      ("a  b", format!("a  b {hover}")),
      ("  a", format!("  {hover} a")),
    ] {
      let el = doc.create_element("p").with_attribute("class", raw);
      let marked = doc.create_element("p").with_attribute("class", &with_marker);
      let plain = describer.describe(&el);
      let hovered = describer.describe(&marked);
      assert_eq!(plain.class_name.as_deref(), Some(raw));
      assert_eq!(hovered.class_name, plain.class_name, "{with_marker:?}");
      assert_eq!(hovered.attributes.get("class"), Some(raw));
    }
  }

  #[test]
  fn class_attribute_holding_only_markers_is_dropped() {
    let doc = Document::new();
    let plain = doc
      .body()
      .append(doc.create_element("p").with_attribute("title", "t"));
    let describer = Describer::default();
    plain.add_marker(describer.markers.selected_class());

    let descriptor = describer.describe(&plain);
    assert_eq!(descriptor.class_name, None);
    assert_eq!(descriptor.attributes.get("class"), None);
    assert_eq!(descriptor.attributes.get("title"), Some("t"));
    assert_eq!(descriptor.path, "html > body > p");
  }

  #[test]
  fn id_is_reported_when_present() {
    let doc = Document::new();
    let el = doc
      .body()
      .append(doc.create_element("SECTION").with_attribute("id", "main"));
    let descriptor = Describer::default().describe(&el);
    assert_eq!(descriptor.tag_name, "section");
    assert_eq!(descriptor.id.as_deref(), Some("main"));
    assert_eq!(descriptor.path, "section#main");
  }
}

#[cfg(test)]
mod proptests {
  use super::*;
  use crate::headless::{Document, Element};
  use proptest::prelude::*;

  proptest! {
    /// Normalized text never holds whitespace runs and respects the limit.
    #[test]
    fn normalized_text_is_collapsed_and_bounded(raw in "[ \\t\\na-z\u{e9}]{0,400}", limit in 1usize..300) {
      let text = normalize_text(&raw, limit);
      prop_assert!(!text.contains("  "), "no double spaces");
      prop_assert!(!text.contains('\n') && !text.contains('\t'));
      prop_assert!(!text.starts_with(' '));
      prop_assert!(text.chars().count() <= limit + 1);

      let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
      if collapsed.chars().count() <= limit {
        prop_assert_eq!(text, collapsed);
      } else {
        prop_assert!(text.ends_with(ELLIPSIS));
      }
    }

    /// Without ids, a path has one segment per ancestor level.
    #[test]
    fn path_has_one_segment_per_level(depth in 1usize..12, classes in proptest::collection::vec("[a-z]{1,6}", 0..5)) {
      let doc = Document::new();
      let mut current: Element = doc.body();
      for _ in 0..depth {
        current = current.append(doc.create_element("div"));
      }
      current.set_attribute("class", &classes.join(" "));

      let path = Describer::default().path(&current);
      let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
      // html + body + depth divs
      prop_assert_eq!(segments.len(), depth + 2);
      let leaf = segments.last().copied().unwrap_or_default();
      prop_assert!(leaf.matches('.').count() <= DEFAULT_PATH_CLASS_LIMIT);
      prop_assert!(leaf.starts_with("div"));
    }
  }
}
