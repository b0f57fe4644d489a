/*! Descriptor of a selected element, handed to the host. */

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use ts_rs::TS;

/// Attribute snapshot of an element, in the order the element reports them.
///
/// Names are unique: a repeated name keeps its first value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
  /// Value of the named attribute, if present.
  pub fn get(&self, name: &str) -> Option<&str> {
    self
      .0
      .iter()
      .find(|(n, _)| n == name)
      .map(|(_, v)| v.as_str())
  }

  /// Number of attributes.
  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Attribute names in element order.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(|(n, _)| n.as_str())
  }

  /// Iterate `(name, value)` pairs in element order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
  }
}

impl FromIterator<(String, String)> for Attributes {
  fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (name, value) in iter {
      if pairs.iter().any(|(n, _)| *n == name) {
        continue;
      }
      pairs.push((name, value));
    }
    Self(pairs)
  }
}

impl Serialize for Attributes {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.0.len()))?;
    for (name, value) in &self.0 {
      map.serialize_entry(name, value)?;
    }
    map.end()
  }
}

/// Serializable summary of the element the user clicked.
///
/// Created fresh for every selection; the bridge keeps no copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SelectedElement {
  /// Lowercase tag name (`div`, `span`, ...).
  pub tag_name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  #[ts(optional)]
  pub id: Option<String>,
  /// Raw class string, without the bridge's own marker classes.
  #[serde(skip_serializing_if = "Option::is_none")]
  #[ts(optional)]
  pub class_name: Option<String>,
  /// Visible text with whitespace collapsed, truncated with `…`.
  pub text_content: String,
  /// Structural path such as `div#root > section > span.a.b`.
  pub path: String,
  #[ts(type = "Record<string, string>")]
  pub attributes: Attributes,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pair(name: &str, value: &str) -> (String, String) {
    (name.to_string(), value.to_string())
  }

  #[test]
  fn attributes_keep_first_value_for_duplicate_names() {
    let attrs: Attributes = vec![pair("href", "/a"), pair("title", "t"), pair("href", "/b")]
      .into_iter()
      .collect();
    assert_eq!(attrs.len(), 2);
    assert_eq!(attrs.get("href"), Some("/a"));
    assert_eq!(attrs.names().collect::<Vec<_>>(), vec!["href", "title"]);
  }

  #[test]
  fn serializes_with_camel_case_and_optional_fields() {
    let element = SelectedElement {
      tag_name: "a".into(),
      id: None,
      class_name: Some("link primary".into()),
      text_content: "Docs".into(),
      path: "nav > a.link.primary".into(),
      attributes: vec![pair("href", "/docs"), pair("class", "link primary")]
        .into_iter()
        .collect(),
    };

    let json = serde_json::to_string(&element).unwrap();
    assert_eq!(
      json,
      r#"{"tagName":"a","className":"link primary","textContent":"Docs","path":"nav > a.link.primary","attributes":{"href":"/docs","class":"link primary"}}"#
    );
  }
}
