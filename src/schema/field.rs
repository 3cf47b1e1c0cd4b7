use serde::Serialize;
use serde_json::Value;

use crate::{access::Operation, schema::document::{self, DocumentFeatures}};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    Checkbox,
    Password,
    Timestamp {
        #[serde(rename = "updatedAt")]
        updated_at: bool,
    },
    Integer,
    Select {
        options: Vec<SelectOption>,
    },
    Relationship {
        /// `List` or `List.field` when the relationship has an inverse.
        target: &'static str,
        many: bool,
    },
    CloudinaryImage {
        folder: String,
    },
    Document {
        features: DocumentFeatures,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum DefaultValue {
    Now,
    Integer(i64),
    Text(&'static str),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub required: bool,
    pub unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
}

impl FieldSpec {
    fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            unique: false,
            default: None,
            min: None,
            min_length: None,
        }
    }

    pub fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn checkbox(name: &'static str) -> Self {
        Self::new(name, FieldKind::Checkbox).default_value(DefaultValue::Bool(false))
    }

    /// Password fields enforce a minimum length of 8.
    pub fn password(name: &'static str) -> Self {
        let mut spec = Self::new(name, FieldKind::Password);
        spec.min_length = Some(8);
        spec
    }

    pub fn timestamp(name: &'static str) -> Self {
        Self::new(name, FieldKind::Timestamp { updated_at: false })
    }

    pub fn updated_at(name: &'static str) -> Self {
        Self::new(name, FieldKind::Timestamp { updated_at: true })
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn select(name: &'static str, options: Vec<SelectOption>) -> Self {
        Self::new(name, FieldKind::Select { options })
    }

    pub fn relationship(name: &'static str, target: &'static str, many: bool) -> Self {
        Self::new(name, FieldKind::Relationship { target, many })
    }

    pub fn cloudinary_image(name: &'static str, folder: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::CloudinaryImage {
                folder: folder.into(),
            },
        )
    }

    pub fn document(name: &'static str, features: DocumentFeatures) -> Self {
        Self::new(name, FieldKind::Document { features })
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_value(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Check one input value against this field's rules. The error is the
    /// human-readable reason; the caller attaches list and field names.
    pub fn check(&self, operation: Operation, value: &FieldValue<'_>) -> Result<(), String> {
        match value {
            FieldValue::Absent => {
                if operation == Operation::Create && self.required && self.default.is_none() {
                    return Err("is required".into());
                }
            }
            FieldValue::Text(text) => {
                if self.required && text.is_empty() {
                    return Err("must not be empty".into());
                }
                if let Some(min_length) = self.min_length {
                    if text.chars().count() < min_length {
                        return Err(format!("must be at least {min_length} characters long"));
                    }
                }
                if let FieldKind::Select { options } = &self.kind {
                    if !options.iter().any(|o| o.value == *text) {
                        let allowed: Vec<&str> = options.iter().map(|o| o.value).collect();
                        return Err(format!("must be one of: {}", allowed.join(", ")));
                    }
                }
            }
            FieldValue::Integer(n) => {
                if let Some(min) = self.min {
                    if *n < min {
                        return Err(format!("must be greater than or equal to {min}"));
                    }
                }
            }
            FieldValue::Document(doc) => {
                if let FieldKind::Document { features } = &self.kind {
                    document::validate(doc, features).map_err(|e| e.to_string())?;
                }
            }
            FieldValue::Present => {}
        }
        Ok(())
    }
}

/// A single input value as seen by validation.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Absent,
    Text(&'a str),
    Integer(i64),
    Document(&'a Value),
    /// Supplied, with nothing further to check at the schema level.
    Present,
}

impl<'a> FieldValue<'a> {
    pub fn text(value: Option<&'a String>) -> Self {
        value.map_or(FieldValue::Absent, |s| FieldValue::Text(s.as_str()))
    }

    pub fn integer(value: Option<i32>) -> Self {
        value.map_or(FieldValue::Absent, |n| FieldValue::Integer(n.into()))
    }

    pub fn document(value: Option<&'a Value>) -> Self {
        value.map_or(FieldValue::Absent, FieldValue::Document)
    }

    pub fn present<T>(value: Option<&T>) -> Self {
        value.map_or(FieldValue::Absent, |_| FieldValue::Present)
    }
}

/// Exposes mutation input to schema validation, field by field.
pub trait FieldInput {
    fn value(&self, field: &str) -> FieldValue<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_field_absent_on_create_only() {
        let spec = FieldSpec::text("name").required();
        assert_eq!(
            spec.check(Operation::Create, &FieldValue::Absent),
            Err("is required".to_string())
        );
        assert_eq!(spec.check(Operation::Update, &FieldValue::Absent), Ok(()));
    }

    #[test]
    fn default_satisfies_required() {
        let spec = FieldSpec::integer("stock")
            .required()
            .default_value(DefaultValue::Integer(0));
        assert_eq!(spec.check(Operation::Create, &FieldValue::Absent), Ok(()));
    }

    #[test]
    fn required_text_must_not_be_empty() {
        let spec = FieldSpec::text("student").required();
        assert!(spec.check(Operation::Update, &FieldValue::Text("")).is_err());
        assert!(spec.check(Operation::Update, &FieldValue::Text("Alice")).is_ok());
    }

    #[test]
    fn password_minimum_length() {
        let spec = FieldSpec::password("password").required();
        assert_eq!(
            spec.check(Operation::Create, &FieldValue::Text("short")),
            Err("must be at least 8 characters long".to_string())
        );
        assert!(spec.check(Operation::Create, &FieldValue::Text("long enough")).is_ok());
    }

    #[test]
    fn select_membership() {
        let spec = FieldSpec::select(
            "status",
            vec![
                SelectOption { label: "A", value: "a" },
                SelectOption { label: "B", value: "b" },
            ],
        );
        assert!(spec.check(Operation::Update, &FieldValue::Text("a")).is_ok());
        assert_eq!(
            spec.check(Operation::Update, &FieldValue::Text("c")),
            Err("must be one of: a, b".to_string())
        );
    }

    #[test]
    fn integer_minimum() {
        let spec = FieldSpec::integer("quantity").required().min(0);
        assert!(spec.check(Operation::Create, &FieldValue::Integer(0)).is_ok());
        assert!(spec.check(Operation::Create, &FieldValue::Integer(-1)).is_err());
    }
}
