//! # Field Renderer
//!
//! Turns `(record, descriptor)` into a [`Cell`], the presentation primitive a
//! host draws. Rendering is a table lookup, not a chain of conditionals:
//!
//! 1. a descriptor-level [`CellRenderer`](crate::descriptor::CellRenderer) hook wins outright
//! 2. otherwise the descriptor's type tag selects a [`RenderFn`] in the [`RendererRegistry`]
//! 3. tags with no entry go to the registry's fallback, which shows the raw value
//!
//! Renderers are pure and infallible. Unmatched options, absent values and
//! unparseable dates all produce a degraded cell instead of an error.
//!
//! ## Built-in types
//!
//! | Tag | Cell | Absent value |
//! |-----|------|--------------|
//! | `text` | formatted text | empty |
//! | `badge` | option label + tone, raw value with neutral tone when unmatched | empty |
//! | `status` | like `badge`, plus a dot colored by the option | empty |
//! | `currency` | `$1,234.56` | `$0.00` |
//! | `date` | `Jan 5, 2024` / `2024-01-05` / `3 days ago` | `N/A` |
//! | `image` | source with placeholder fallback | placeholder |
//! | `action` | one trigger per option | triggers still listed |
//! | `select` | option label, raw value when unmatched | empty |

use crate::descriptor::{FieldDescriptor, FieldType};
use crate::record::{as_number, display, lookup};
use crate::settings::DateStyle;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use vitrine_theme::Tone;

/// Shown for absent dates.
pub const NOT_AVAILABLE: &str = "N/A";

/// Formatting knobs shared by all renderers, usually taken from [`Settings`](crate::settings::Settings).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub currency_symbol: String,
    pub date_style: DateStyle,
    pub image_placeholder: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            date_style: DateStyle::Medium,
            image_placeholder: "/placeholder.png".to_string(),
        }
    }
}

/// Image source with a placeholder swapped in after a load failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageCell {
    pub src: String,
    pub alt: String,
    pub fallback: String,
    pub failed: bool,
}

impl ImageCell {
    /// The source a host should display right now.
    pub fn effective_src(&self) -> &str {
        if self.failed || self.src.is_empty() {
            &self.fallback
        } else {
            &self.src
        }
    }

    /// Records a load failure. There is no retry: the placeholder sticks.
    pub fn fail(&mut self) {
        self.failed = true;
    }
}

/// A row-scoped action button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionTrigger {
    pub action: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    Empty,
    Text {
        text: String,
    },
    Badge {
        label: String,
        tone: Tone,
        #[serde(skip_serializing_if = "Option::is_none")]
        text_tone: Option<Tone>,
        #[serde(skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
        matched: bool,
    },
    Status {
        label: String,
        dot: Tone,
        matched: bool,
    },
    Currency {
        text: String,
        amount: f64,
    },
    Date {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        iso: Option<String>,
    },
    Image(ImageCell),
    Actions {
        triggers: Vec<ActionTrigger>,
    },
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Cell::Text { text: text.into() }
    }

    /// Text content of the cell, as a terminal or a screen reader would show it.
    pub fn plain_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text { text } | Cell::Currency { text, .. } | Cell::Date { text, .. } => {
                text.clone()
            }
            Cell::Badge { label, .. } | Cell::Status { label, .. } => label.clone(),
            Cell::Image(image) => image.alt.clone(),
            Cell::Actions { triggers } => triggers
                .iter()
                .map(|t| t.label.as_str())
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }

    /// Semantic color carried by the cell, if any.
    pub fn tone(&self) -> Option<Tone> {
        match self {
            Cell::Badge { tone, .. } => Some(*tone),
            Cell::Status { dot, .. } => Some(*dot),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// A pure renderer for one type tag. Receives the value already resolved from the key path.
pub type RenderFn = fn(&FieldDescriptor, &Value, &RenderOptions) -> Cell;

/// Type tag to renderer map with a mandatory fallback branch.
#[derive(Clone)]
pub struct RendererRegistry {
    renderers: HashMap<String, RenderFn>,
    fallback: RenderFn,
    options: RenderOptions,
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl RendererRegistry {
    /// A registry with every built-in type registered.
    pub fn new(options: RenderOptions) -> Self {
        let mut registry = Self {
            renderers: HashMap::new(),
            fallback: render_raw,
            options,
        };
        registry.register(FieldType::Text, render_text);
        registry.register(FieldType::Badge, render_badge);
        registry.register(FieldType::Status, render_status);
        registry.register(FieldType::Currency, render_currency);
        registry.register(FieldType::Date, render_date);
        registry.register(FieldType::Image, render_image);
        registry.register(FieldType::Action, render_actions);
        registry.register(FieldType::Select, render_select);
        registry.register(FieldType::Search, render_text);
        registry.register(FieldType::Sort, render_select);
        registry
    }

    /// Adds or replaces the renderer for a type tag.
    pub fn register(&mut self, field_type: impl Into<FieldType>, renderer: RenderFn) {
        let field_type = field_type.into();
        self.renderers.insert(field_type.tag().to_string(), renderer);
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn is_registered(&self, field_type: &FieldType) -> bool {
        self.renderers.contains_key(field_type.tag())
    }

    pub fn render(&self, record: &Value, descriptor: &FieldDescriptor) -> Cell {
        let value = lookup(record, &descriptor.key);

        if let Some(hook) = &descriptor.renderer {
            return hook.render(record, value);
        }

        match self.renderers.get(descriptor.field_type.tag()) {
            Some(renderer) => renderer(descriptor, value, &self.options),
            None => {
                tracing::warn!(
                    key = %descriptor.key,
                    field_type = %descriptor.field_type.tag(),
                    "no renderer for field type, showing raw value"
                );
                (self.fallback)(descriptor, value, &self.options)
            }
        }
    }
}

fn render_raw(_: &FieldDescriptor, value: &Value, _: &RenderOptions) -> Cell {
    if value.is_null() {
        Cell::Empty
    } else {
        Cell::text(display(value))
    }
}

fn render_text(descriptor: &FieldDescriptor, value: &Value, _: &RenderOptions) -> Cell {
    if let Some(formatter) = &descriptor.formatter {
        return Cell::text(formatter.format(value));
    }
    if value.is_null() {
        return Cell::Empty;
    }
    let raw = display(value);
    match &descriptor.format {
        Some(format) => Cell::text(format.apply(&raw)),
        None => Cell::text(raw),
    }
}

fn render_badge(descriptor: &FieldDescriptor, value: &Value, _: &RenderOptions) -> Cell {
    if value.is_null() {
        return Cell::Empty;
    }
    match descriptor.find_option(value) {
        Some(option) => Cell::Badge {
            label: option.label.clone(),
            tone: option.tone(),
            text_tone: option.text_tone(),
            icon: option.icon.clone(),
            matched: true,
        },
        None => Cell::Badge {
            label: display(value),
            tone: Tone::Neutral,
            text_tone: None,
            icon: None,
            matched: false,
        },
    }
}

fn render_status(descriptor: &FieldDescriptor, value: &Value, _: &RenderOptions) -> Cell {
    if value.is_null() {
        return Cell::Empty;
    }
    match descriptor.find_option(value) {
        Some(option) => Cell::Status {
            label: option.label.clone(),
            dot: option.tone(),
            matched: true,
        },
        None => Cell::Status {
            label: display(value),
            dot: Tone::Neutral,
            matched: false,
        },
    }
}

fn render_select(descriptor: &FieldDescriptor, value: &Value, _: &RenderOptions) -> Cell {
    if value.is_null() {
        return Cell::Empty;
    }
    match descriptor.find_option(value) {
        Some(option) => Cell::text(option.label.clone()),
        None => Cell::text(display(value)),
    }
}

fn render_currency(_: &FieldDescriptor, value: &Value, options: &RenderOptions) -> Cell {
    let amount = as_number(value).unwrap_or(0.0);
    Cell::Currency {
        text: format_currency(amount, &options.currency_symbol),
        amount,
    }
}

fn render_date(_: &FieldDescriptor, value: &Value, options: &RenderOptions) -> Cell {
    if value.is_null() || value.as_str().is_some_and(str::is_empty) {
        return Cell::Date {
            text: NOT_AVAILABLE.to_string(),
            iso: None,
        };
    }
    match parse_date(value) {
        Some(date) => Cell::Date {
            text: format_date_at(date, options.date_style, Utc::now()),
            iso: Some(date.to_rfc3339()),
        },
        None => Cell::Date {
            text: display(value),
            iso: None,
        },
    }
}

fn render_image(descriptor: &FieldDescriptor, value: &Value, options: &RenderOptions) -> Cell {
    let src = match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.first().map(display).unwrap_or_default(),
        _ => String::new(),
    };
    Cell::Image(ImageCell {
        failed: src.is_empty(),
        src,
        alt: descriptor.display_label().to_string(),
        fallback: options.image_placeholder.clone(),
    })
}

fn render_actions(descriptor: &FieldDescriptor, _: &Value, _: &RenderOptions) -> Cell {
    let triggers = descriptor
        .options
        .iter()
        .map(|option| ActionTrigger {
            action: option.value.clone(),
            label: option.label.clone(),
            icon: option.icon.clone(),
            tone: option.tone(),
        })
        .collect();
    Cell::Actions { triggers }
}

/// `1234.5` with `$` becomes `$1,234.50`; negatives keep the sign in front.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}{}.{}", sign, symbol, grouped, cents)
}

/// Accepts RFC 3339 timestamps, `YYYY-MM-DD`, naive date-times and epoch milliseconds.
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(date) = DateTime::parse_from_rfc3339(s) {
                return Some(date.with_timezone(&Utc));
            }
            for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, pattern) {
                    return Some(naive.and_utc());
                }
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        }
        _ => None,
    }
}

pub fn format_date_at(date: DateTime<Utc>, style: DateStyle, now: DateTime<Utc>) -> String {
    match style {
        DateStyle::Medium => date.format("%b %-d, %Y").to_string(),
        DateStyle::Iso => date.format("%Y-%m-%d").to_string(),
        DateStyle::Relative => {
            let elapsed = now.signed_duration_since(date);
            timeago::Formatter::new().convert(elapsed.to_std().unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{OptionItem, TextFormat};
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn status_options() -> Vec<OptionItem> {
        vec![
            OptionItem::new("PENDING", "Pending").color("yellow"),
            OptionItem::new("SHIPPED", "Shipped").color("bg-green-100 text-green-800"),
        ]
    }

    fn registry() -> RendererRegistry {
        RendererRegistry::default()
    }

    #[test]
    fn badge_matches_option() {
        let d = FieldDescriptor::new("status", FieldType::Badge, "Status").options(status_options());
        let cell = registry().render(&json!({ "status": "SHIPPED" }), &d);
        assert_eq!(cell.plain_text(), "Shipped");
        assert_eq!(cell.tone(), Some(Tone::Green));
    }

    #[test]
    fn badge_unknown_value_falls_back_to_raw_and_neutral() {
        let d = FieldDescriptor::new("status", FieldType::Badge, "Status")
            .options(vec![OptionItem::new("PENDING", "Pending").color("yellow")]);
        let cell = registry().render(&json!({ "status": "UNKNOWN" }), &d);
        assert_eq!(
            cell,
            Cell::Badge {
                label: "UNKNOWN".into(),
                tone: Tone::Neutral,
                text_tone: None,
                icon: None,
                matched: false,
            }
        );
    }

    #[test]
    fn status_dot_uses_option_color() {
        let d = FieldDescriptor::new("status", FieldType::Status, "Status").options(status_options());
        let cell = registry().render(&json!({ "status": "PENDING" }), &d);
        assert_eq!(
            cell,
            Cell::Status {
                label: "Pending".into(),
                dot: Tone::Yellow,
                matched: true
            }
        );
    }

    #[test]
    fn text_applies_format_and_formatter() {
        let record = json!({ "name": "running shoe" });
        let upper = FieldDescriptor::text("name", "Name").format(TextFormat::Uppercase);
        assert_eq!(registry().render(&record, &upper).plain_text(), "RUNNING SHOE");

        let custom = FieldDescriptor::text("name", "Name")
            .format(TextFormat::Uppercase)
            .format_with(|v: &Value| format!("<{}>", display(v)));
        assert_eq!(registry().render(&record, &custom).plain_text(), "<running shoe>");
    }

    #[test]
    fn nested_key_paths() {
        let d = FieldDescriptor::text("customer.name", "Customer");
        let cell = registry().render(&json!({ "customer": { "name": "Ada" } }), &d);
        assert_eq!(cell.plain_text(), "Ada");
        assert!(registry().render(&json!({ "customer": null }), &d).is_empty());
    }

    #[test]
    fn currency_formats_and_defaults_to_zero() {
        let d = FieldDescriptor::new("price", FieldType::Currency, "Price");
        assert_eq!(registry().render(&json!({ "price": 1234.5 }), &d).plain_text(), "$1,234.50");
        assert_eq!(registry().render(&json!({}), &d).plain_text(), "$0.00");
        assert_eq!(registry().render(&json!({ "price": "abc" }), &d).plain_text(), "$0.00");
        assert_eq!(registry().render(&json!({ "price": "19.9" }), &d).plain_text(), "$19.90");
    }

    #[test]
    fn currency_grouping() {
        assert_eq!(format_currency(0.0, "$"), "$0.00");
        assert_eq!(format_currency(999.999, "$"), "$1,000.00");
        assert_eq!(format_currency(1234567.891, "€"), "€1,234,567.89");
        assert_eq!(format_currency(-42.0, "$"), "-$42.00");
    }

    #[test]
    fn date_medium_and_missing() {
        let d = FieldDescriptor::new("createdAt", FieldType::Date, "Created");
        let cell = registry().render(&json!({ "createdAt": "2024-01-05T10:00:00Z" }), &d);
        assert_eq!(cell.plain_text(), "Jan 5, 2024");
        assert_eq!(registry().render(&json!({}), &d).plain_text(), "N/A");
        assert_eq!(
            registry().render(&json!({ "createdAt": "someday" }), &d).plain_text(),
            "someday"
        );
    }

    #[test]
    fn date_parsing_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        assert_eq!(parse_date(&json!("2024-01-05")), Some(expected));
        assert_eq!(parse_date(&json!(expected.timestamp_millis())), Some(expected));
        assert_eq!(parse_date(&json!("2024-01-05 00:00:00")), Some(expected));
        assert_eq!(parse_date(&json!(true)), None);
    }

    #[test]
    fn date_styles() {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let now = date + Duration::days(3);
        assert_eq!(format_date_at(date, DateStyle::Iso, now), "2024-03-09");
        assert_eq!(format_date_at(date, DateStyle::Medium, now), "Mar 9, 2024");
        assert_eq!(format_date_at(date, DateStyle::Relative, now), "3 days ago");
    }

    #[test]
    fn image_falls_back_to_placeholder() {
        let d = FieldDescriptor::new("image", FieldType::Image, "Photo");
        let Cell::Image(mut image) = registry().render(&json!({ "image": "/shoe.png" }), &d) else {
            panic!("expected an image cell");
        };
        assert_eq!(image.effective_src(), "/shoe.png");
        image.fail();
        assert_eq!(image.effective_src(), "/placeholder.png");

        let Cell::Image(missing) = registry().render(&json!({}), &d) else {
            panic!("expected an image cell");
        };
        assert_eq!(missing.effective_src(), "/placeholder.png");
    }

    #[test]
    fn actions_list_triggers() {
        let d = FieldDescriptor::new("actions", FieldType::Action, "").options(vec![
            OptionItem::new("view", "View"),
            OptionItem::new("delete", "Delete").color("red"),
        ]);
        let Cell::Actions { triggers } = registry().render(&json!({ "id": 1 }), &d) else {
            panic!("expected actions");
        };
        assert_eq!(triggers.len(), 2);
        assert_eq!(triggers[1].action, "delete");
        assert_eq!(triggers[1].tone, Tone::Red);
    }

    #[test]
    fn unknown_type_shows_raw_value() {
        let d = FieldDescriptor::new("trend", FieldType::from("sparkline"), "Trend");
        assert_eq!(registry().render(&json!({ "trend": [1, 2] }), &d).plain_text(), "1, 2");
    }

    #[test]
    fn hook_takes_precedence() {
        let d = FieldDescriptor::new("price", FieldType::Currency, "Price")
            .render_with(|record: &Value, _: &Value| Cell::text(display(&record["sku"])));
        let cell = registry().render(&json!({ "price": 3, "sku": "A-1" }), &d);
        assert_eq!(cell.plain_text(), "A-1");
    }

    #[test]
    fn registered_renderer_replaces_builtin() {
        fn shout(_: &FieldDescriptor, v: &Value, _: &RenderOptions) -> Cell {
            Cell::text(display(v).to_uppercase())
        }
        let mut registry = registry();
        registry.register("sparkline", shout);
        let d = FieldDescriptor::new("trend", FieldType::from("sparkline"), "Trend");
        assert!(registry.is_registered(&d.field_type));
        assert_eq!(registry.render(&json!({ "trend": "up" }), &d).plain_text(), "UP");
    }

    #[test]
    fn cells_serialize_with_kind_tag() {
        let value = serde_json::to_value(Cell::text("hi")).unwrap();
        assert_eq!(value, json!({ "kind": "text", "text": "hi" }));
    }
}
