//! # Field Descriptors
//!
//! A [`FieldDescriptor`] is the declarative record describing how one entity
//! attribute is displayed and edited. Column lists, filter schemas, mobile
//! cards and detail tabs are all built out of descriptors.
//!
//! Descriptors are plain data and deserialize from JSON:
//!
//! ```json
//! { "key": "status", "type": "badge", "label": "Status",
//!   "options": [{ "value": "PENDING", "label": "Pending", "color": "yellow" }] }
//! ```
//!
//! Behavior that cannot be data (a fully custom cell, a formatting closure)
//! is attached through the [`CellRenderer`] and [`ValueFormatter`] capability
//! traits. Those hooks are skipped by serde, so a descriptor loaded from JSON
//! is always hook-free.

use crate::error::ConfigViolation;
use crate::record::{display, scalar_string};
use crate::render::Cell;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use unicode_width::UnicodeWidthStr;
use vitrine_theme::{fit_width, Tone};

/// Declared type of a field. Unknown tags are kept verbatim in [`FieldType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    #[default]
    Text,
    Badge,
    Currency,
    Date,
    Image,
    Status,
    Action,
    Select,
    Search,
    Sort,
    Other(String),
}

impl FieldType {
    /// The tag used in JSON and as the renderer registry key.
    pub fn tag(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Badge => "badge",
            FieldType::Currency => "currency",
            FieldType::Date => "date",
            FieldType::Image => "image",
            FieldType::Status => "status",
            FieldType::Action => "action",
            FieldType::Select => "select",
            FieldType::Search => "search",
            FieldType::Sort => "sort",
            FieldType::Other(tag) => tag,
        }
    }

    /// Types allowed in a filter schema.
    pub fn is_filter(&self) -> bool {
        matches!(self, FieldType::Search | FieldType::Select | FieldType::Sort)
    }

    /// Types whose rendering looks the record value up in `options`.
    pub fn uses_options(&self) -> bool {
        matches!(
            self,
            FieldType::Badge | FieldType::Status | FieldType::Select | FieldType::Action
        )
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "text" => FieldType::Text,
            "badge" => FieldType::Badge,
            "currency" => FieldType::Currency,
            "date" => FieldType::Date,
            "image" => FieldType::Image,
            "status" => FieldType::Status,
            "action" | "actions" => FieldType::Action,
            "select" => FieldType::Select,
            "search" => FieldType::Search,
            "sort" => FieldType::Sort,
            _ => FieldType::Other(tag),
        }
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        FieldType::from(tag.to_string())
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.tag().to_string()
    }
}

/// One entry of an option list (badge/status labels, select choices, row actions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionItem {
    #[serde(deserialize_with = "scalar_string")]
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

impl OptionItem {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            color: None,
            icon: None,
            text_color: None,
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = Some(color.into());
        self
    }

    /// Tone of the option's `color`, neutral when unset.
    pub fn tone(&self) -> Tone {
        self.color.as_deref().map(Tone::parse).unwrap_or_default()
    }

    pub fn text_tone(&self) -> Option<Tone> {
        self.text_color.as_deref().map(Tone::parse)
    }
}

/// Built-in, serializable text formats for `text` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextFormat {
    Uppercase,
    Lowercase,
    /// First letter of every word upper-cased, `snake_case` and `SCREAMING` split on `_`.
    Capitalize,
    /// Cut to a display width, ending with `…`.
    Truncate(usize),
}

impl TextFormat {
    pub fn apply(&self, text: &str) -> String {
        match self {
            TextFormat::Uppercase => text.to_uppercase(),
            TextFormat::Lowercase => text.to_lowercase(),
            TextFormat::Capitalize => text
                .split(|c: char| c == '_' || c.is_whitespace())
                .filter(|word| !word.is_empty())
                .map(|word| {
                    let lower = word.to_lowercase();
                    let mut chars = lower.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
            TextFormat::Truncate(max) if text.width() > *max => {
                fit_width(text, *max).trim_end().to_string()
            }
            TextFormat::Truncate(_) => text.to_string(),
        }
    }
}

/// Control used to edit a field in the detail panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorKind {
    Input,
    Number,
    Date,
    Select,
    Textarea,
}

/// Full override of how a field becomes a cell.
///
/// Receives the whole record and the value found at the descriptor's key path.
pub trait CellRenderer: Send + Sync {
    fn render(&self, record: &Value, value: &Value) -> Cell;
}

impl<F> CellRenderer for F
where
    F: Fn(&Value, &Value) -> Cell + Send + Sync,
{
    fn render(&self, record: &Value, value: &Value) -> Cell {
        self(record, value)
    }
}

/// Custom text formatting for `text` fields. Takes precedence over [`TextFormat`].
pub trait ValueFormatter: Send + Sync {
    fn format(&self, value: &Value) -> String;
}

impl<F> ValueFormatter for F
where
    F: Fn(&Value) -> String + Send + Sync,
{
    fn format(&self, value: &Value) -> String {
        self(value)
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub key: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<TextFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<EditorKind>,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip)]
    pub renderer: Option<Arc<dyn CellRenderer>>,
    #[serde(skip)]
    pub formatter: Option<Arc<dyn ValueFormatter>>,
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("key", &self.key)
            .field("field_type", &self.field_type)
            .field("label", &self.label)
            .field("options", &self.options)
            .field("format", &self.format)
            .field("min_width", &self.min_width)
            .field("editor", &self.editor)
            .field("readonly", &self.readonly)
            .field("renderer", &self.renderer.as_ref().map(|_| "<hook>"))
            .field("formatter", &self.formatter.as_ref().map(|_| "<hook>"))
            .finish()
    }
}

impl FieldDescriptor {
    pub fn new(key: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            field_type,
            label: label.into(),
            options: Vec::new(),
            format: None,
            min_width: None,
            editor: None,
            readonly: false,
            placeholder: None,
            renderer: None,
            formatter: None,
        }
    }

    pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, FieldType::Text, label)
    }

    pub fn options(mut self, options: Vec<OptionItem>) -> Self {
        self.options = options;
        self
    }

    pub fn format(mut self, format: TextFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn min_width(mut self, width: u32) -> Self {
        self.min_width = Some(width);
        self
    }

    pub fn editor(mut self, editor: EditorKind) -> Self {
        self.editor = Some(editor);
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn render_with(mut self, renderer: impl CellRenderer + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    pub fn format_with(mut self, formatter: impl ValueFormatter + 'static) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Option whose value matches the raw value's display form.
    pub fn find_option(&self, raw: &Value) -> Option<&OptionItem> {
        let needle = display(raw);
        self.options.iter().find(|option| option.value == needle)
    }

    /// Label shown in headers and forms, falling back to the key.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.key
        } else {
            &self.label
        }
    }

    /// Editor used in the detail panel, `None` for fields that are never edited.
    pub fn editor_kind(&self) -> Option<EditorKind> {
        if self.readonly || self.key == "id" {
            return None;
        }
        if self.editor.is_some() {
            return self.editor;
        }
        match self.field_type {
            FieldType::Action => None,
            FieldType::Badge | FieldType::Status | FieldType::Select => Some(EditorKind::Select),
            FieldType::Currency => Some(EditorKind::Number),
            FieldType::Date => Some(EditorKind::Date),
            _ => Some(EditorKind::Input),
        }
    }

    /// Problems with this descriptor as authored configuration.
    pub fn violations(&self, location: &str) -> Vec<ConfigViolation> {
        let here = if self.key.is_empty() {
            location.to_string()
        } else {
            format!("{}.{}", location, self.key)
        };
        let mut found = Vec::new();

        if self.key.is_empty() {
            found.push(ConfigViolation::new(&here, "descriptor has an empty key"));
        }
        if self.label.is_empty() {
            found.push(ConfigViolation::new(&here, "descriptor has no label"));
        }
        if let FieldType::Other(tag) = &self.field_type {
            if self.renderer.is_none() {
                found.push(ConfigViolation::new(
                    &here,
                    format!("unknown field type '{}' will render the raw value", tag),
                ));
            }
        }
        if self.field_type.uses_options() && self.options.is_empty() && self.renderer.is_none() {
            found.push(ConfigViolation::new(
                &here,
                format!("'{}' field declares no options", self.field_type.tag()),
            ));
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_type_from_known_tags() {
        assert_eq!(FieldType::from("badge"), FieldType::Badge);
        assert_eq!(FieldType::from("Currency"), FieldType::Currency);
        assert_eq!(FieldType::from("actions"), FieldType::Action);
    }

    #[test]
    fn field_type_keeps_unknown_tags() {
        let ft = FieldType::from("sparkline");
        assert_eq!(ft, FieldType::Other("sparkline".into()));
        assert_eq!(ft.tag(), "sparkline");
    }

    #[test]
    fn descriptor_deserializes_from_json() {
        let d: FieldDescriptor = serde_json::from_value(json!({
            "key": "status",
            "type": "badge",
            "label": "Status",
            "minWidth": 120,
            "options": [{ "value": "PENDING", "label": "Pending", "color": "yellow" }]
        }))
        .unwrap();

        assert_eq!(d.field_type, FieldType::Badge);
        assert_eq!(d.min_width, Some(120));
        assert_eq!(d.options[0].tone(), Tone::Yellow);
        assert!(d.renderer.is_none());
    }

    #[test]
    fn option_values_accept_numbers() {
        let option: OptionItem =
            serde_json::from_value(json!({ "value": 3, "label": "Three" })).unwrap();
        assert_eq!(option.value, "3");
    }

    #[test]
    fn type_defaults_to_text() {
        let d: FieldDescriptor =
            serde_json::from_value(json!({ "key": "name", "label": "Name" })).unwrap();
        assert_eq!(d.field_type, FieldType::Text);
    }

    #[test]
    fn find_option_matches_loosely() {
        let d = FieldDescriptor::new("rating", FieldType::Badge, "Rating")
            .options(vec![OptionItem::new("5", "Five stars")]);
        assert_eq!(d.find_option(&json!(5)).unwrap().label, "Five stars");
        assert!(d.find_option(&json!(4)).is_none());
    }

    #[test]
    fn text_formats() {
        assert_eq!(TextFormat::Uppercase.apply("shoe"), "SHOE");
        assert_eq!(TextFormat::Capitalize.apply("IN_TRANSIT"), "In Transit");
        assert_eq!(TextFormat::Truncate(5).apply("sneakers"), "snea…");
        assert_eq!(TextFormat::Truncate(10).apply("sneakers"), "sneakers");
    }

    #[test]
    fn text_format_deserializes() {
        let f: TextFormat = serde_json::from_value(json!({ "truncate": 12 })).unwrap();
        assert_eq!(f, TextFormat::Truncate(12));
        let f: TextFormat = serde_json::from_value(json!("uppercase")).unwrap();
        assert_eq!(f, TextFormat::Uppercase);
    }

    #[test]
    fn editor_kind_defaults_by_type() {
        assert_eq!(
            FieldDescriptor::new("status", FieldType::Status, "Status").editor_kind(),
            Some(EditorKind::Select)
        );
        assert_eq!(
            FieldDescriptor::new("price", FieldType::Currency, "Price").editor_kind(),
            Some(EditorKind::Number)
        );
        assert_eq!(
            FieldDescriptor::text("notes", "Notes")
                .editor(EditorKind::Textarea)
                .editor_kind(),
            Some(EditorKind::Textarea)
        );
        assert_eq!(FieldDescriptor::text("id", "ID").editor_kind(), None);
        assert_eq!(
            FieldDescriptor::text("email", "Email").readonly().editor_kind(),
            None
        );
    }

    #[test]
    fn violations_report_missing_options_and_unknown_types() {
        let badge = FieldDescriptor::new("status", FieldType::Badge, "Status");
        assert_eq!(badge.violations("columns").len(), 1);

        let odd = FieldDescriptor::new("trend", FieldType::from("sparkline"), "");
        let found = odd.violations("columns");
        assert_eq!(found.len(), 2);
        assert!(found[0].location.ends_with("trend"));
    }

    #[test]
    fn hooks_silence_option_violations() {
        let d = FieldDescriptor::new("status", FieldType::Badge, "Status")
            .render_with(|_: &Value, _: &Value| Cell::Empty);
        assert!(d.violations("columns").is_empty());
    }
}
