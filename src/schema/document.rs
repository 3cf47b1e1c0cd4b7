//! Structural validation for rich document fields.
//!
//! A document is stored as JSON: an array of element nodes (`type`,
//! `children`) whose leaves are text nodes (`text` plus optional boolean
//! marks). Which element types and marks are accepted depends on the
//! features enabled on the field.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

const MAX_DEPTH: usize = 32;

const FORMATTING_ELEMENTS: [&str; 7] = [
    "heading",
    "blockquote",
    "code",
    "ordered-list",
    "unordered-list",
    "list-item",
    "list-item-content",
];

const MARKS: [&str; 8] = [
    "bold",
    "italic",
    "underline",
    "strikethrough",
    "code",
    "superscript",
    "subscript",
    "keyboard",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentFeatures {
    pub formatting: bool,
    pub links: bool,
    pub dividers: bool,
}

impl DocumentFeatures {
    pub const ALL: DocumentFeatures = DocumentFeatures {
        formatting: true,
        links: true,
        dividers: true,
    };

    fn allows_element(&self, kind: &str) -> Option<bool> {
        match kind {
            "paragraph" => Some(true),
            "link" => Some(self.links),
            "divider" => Some(self.dividers),
            k if FORMATTING_ELEMENTS.contains(&k) => Some(self.formatting),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("document must be an array of nodes")]
    NotAnArray,
    #[error("node at {path} must be an object")]
    NotAnObject { path: String },
    #[error("node at {path} has neither a type nor text")]
    UnknownShape { path: String },
    #[error("element '{kind}' at {path} is not supported")]
    UnknownElement { path: String, kind: String },
    #[error("element '{kind}' at {path} is not enabled for this field")]
    ElementNotEnabled { path: String, kind: String },
    #[error("element at {path} needs a children array")]
    MissingChildren { path: String },
    #[error("link at {path} needs an href")]
    MissingHref { path: String },
    #[error("heading at {path} needs a level between 1 and 6")]
    InvalidHeadingLevel { path: String },
    #[error("mark '{mark}' at {path} is not supported")]
    UnknownMark { path: String, mark: String },
    #[error("mark '{mark}' at {path} requires formatting")]
    MarkNotEnabled { path: String, mark: String },
    #[error("document nests too deeply")]
    TooDeep,
}

pub fn validate(document: &Value, features: &DocumentFeatures) -> Result<(), DocumentError> {
    let nodes = document.as_array().ok_or(DocumentError::NotAnArray)?;
    validate_children(nodes, features, "", 0)
}

fn validate_children(
    nodes: &[Value],
    features: &DocumentFeatures,
    parent: &str,
    depth: usize,
) -> Result<(), DocumentError> {
    if depth > MAX_DEPTH {
        return Err(DocumentError::TooDeep);
    }
    for (index, node) in nodes.iter().enumerate() {
        let path = if parent.is_empty() {
            index.to_string()
        } else {
            format!("{parent}.children.{index}")
        };
        let object = node
            .as_object()
            .ok_or_else(|| DocumentError::NotAnObject { path: path.clone() })?;

        if let Some(kind) = object.get("type").and_then(Value::as_str) {
            validate_element(kind, object, features, &path, depth)?;
        } else if object.get("text").is_some_and(Value::is_string) {
            validate_text(object, features, &path)?;
        } else {
            return Err(DocumentError::UnknownShape { path });
        }
    }
    Ok(())
}

fn validate_element(
    kind: &str,
    object: &Map<String, Value>,
    features: &DocumentFeatures,
    path: &str,
    depth: usize,
) -> Result<(), DocumentError> {
    match features.allows_element(kind) {
        None => {
            return Err(DocumentError::UnknownElement {
                path: path.to_string(),
                kind: kind.to_string(),
            });
        }
        Some(false) => {
            return Err(DocumentError::ElementNotEnabled {
                path: path.to_string(),
                kind: kind.to_string(),
            });
        }
        Some(true) => {}
    }

    if kind == "link" && !object.get("href").is_some_and(Value::is_string) {
        return Err(DocumentError::MissingHref {
            path: path.to_string(),
        });
    }
    if kind == "heading" {
        let level = object.get("level").and_then(Value::as_u64).unwrap_or(0);
        if !(1..=6).contains(&level) {
            return Err(DocumentError::InvalidHeadingLevel {
                path: path.to_string(),
            });
        }
    }

    let children = object
        .get("children")
        .and_then(Value::as_array)
        .ok_or_else(|| DocumentError::MissingChildren {
            path: path.to_string(),
        })?;
    validate_children(children, features, path, depth + 1)
}

fn validate_text(
    object: &Map<String, Value>,
    features: &DocumentFeatures,
    path: &str,
) -> Result<(), DocumentError> {
    for key in object.keys().filter(|k| k.as_str() != "text") {
        if !MARKS.contains(&key.as_str()) {
            return Err(DocumentError::UnknownMark {
                path: path.to_string(),
                mark: key.clone(),
            });
        }
        if !features.formatting {
            return Err(DocumentError::MarkNotEnabled {
                path: path.to_string(),
                mark: key.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const PLAIN: DocumentFeatures = DocumentFeatures {
        formatting: false,
        links: false,
        dividers: false,
    };

    #[test]
    fn accepts_a_formatted_document() {
        let doc = json!([
            { "type": "heading", "level": 2, "children": [{ "text": "Hoodie" }] },
            { "type": "paragraph", "children": [
                { "text": "Warm and " },
                { "text": "soft", "bold": true },
                { "type": "link", "href": "https://example.com", "children": [{ "text": "size chart" }] }
            ]},
            { "type": "divider", "children": [{ "text": "" }] }
        ]);
        assert_eq!(validate(&doc, &DocumentFeatures::ALL), Ok(()));
    }

    #[test]
    fn rejects_non_array_root() {
        assert_eq!(
            validate(&json!({ "text": "x" }), &DocumentFeatures::ALL),
            Err(DocumentError::NotAnArray)
        );
    }

    #[test]
    fn disabled_features_are_rejected() {
        let divider = json!([{ "type": "divider", "children": [{ "text": "" }] }]);
        assert!(matches!(
            validate(&divider, &PLAIN),
            Err(DocumentError::ElementNotEnabled { .. })
        ));

        let bold = json!([{ "type": "paragraph", "children": [{ "text": "x", "bold": true }] }]);
        assert_eq!(
            validate(&bold, &PLAIN),
            Err(DocumentError::MarkNotEnabled {
                path: "0.children.0".into(),
                mark: "bold".into()
            })
        );
    }

    #[test]
    fn link_without_href_is_rejected() {
        let doc = json!([{ "type": "paragraph", "children": [
            { "type": "link", "children": [{ "text": "x" }] }
        ]}]);
        assert_eq!(
            validate(&doc, &DocumentFeatures::ALL),
            Err(DocumentError::MissingHref {
                path: "0.children.0".into()
            })
        );
    }

    #[test]
    fn unknown_elements_are_rejected() {
        let doc = json!([{ "type": "image", "children": [] }]);
        assert!(matches!(
            validate(&doc, &DocumentFeatures::ALL),
            Err(DocumentError::UnknownElement { .. })
        ));
    }

    #[test]
    fn deeply_nested_documents_are_rejected() {
        let mut node = json!({ "text": "leaf" });
        for _ in 0..40 {
            node = json!({ "type": "blockquote", "children": [node] });
        }
        assert_eq!(
            validate(&json!([node]), &DocumentFeatures::ALL),
            Err(DocumentError::TooDeep)
        );
    }
}
