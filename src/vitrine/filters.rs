//! # Filter State
//!
//! Filter values belong to the host. This module only projects them against a
//! [`FilterSchema`]: which filters are active, what chip each one shows, and
//! which [`FilterDelta`] undoes it.
//!
//! ```text
//! values  {search: "shoe", status: "all", sortOrder: "desc"}
//! schema  search(default "") · status(default "all") · sortBy(default first option)
//! chips   [Search: shoe]            removal delta {search: ""}
//! ```
//!
//! ## Defaults
//!
//! A field's default is its explicit `default`, otherwise `""` for search,
//! `"all"` for select and the first option for sort. A value that is absent
//! or `null` counts as the default. Values compare loosely, so `10` and
//! `"10"` are the same filter value.
//!
//! `sortOrder` is never an active filter: flipping the sort direction does
//! not produce a chip or light up "clear all".
//!
//! Screens with their own notion of "active" plug in an [`ActiveFilterRules`]
//! implementation; the generic [`DefaultRules`] are used otherwise.

use crate::descriptor::{FieldDescriptor, FieldType, OptionItem};
use crate::error::ConfigViolation;
use crate::layout::FilterSurface;
use crate::record::{display, loosely_equal, NULL};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;
use vitrine_theme::Tone;

/// Key holding the sort direction. Excluded from active-filter detection.
pub const SORT_ORDER_KEY: &str = "sortOrder";
/// Select value meaning "no restriction".
pub const SELECT_ALL: &str = "all";

/// Current filter values, keyed by filter key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterValues(BTreeMap<String, Value>);

impl FilterValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> &Value {
        self.0.get(key).unwrap_or(&NULL)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for FilterValues {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A partial update to filter values. Keys not present are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterDelta(BTreeMap<String, Value>);

impl FilterDelta {
    pub fn single(key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut changes = BTreeMap::new();
        changes.insert(key.into(), value.into());
        Self(changes)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The host-side merge: `values` with every key of the delta overwritten.
    pub fn apply_to(&self, values: &FilterValues) -> FilterValues {
        let mut next = values.clone();
        for (key, value) in &self.0 {
            next.set(key.clone(), value.clone());
        }
        next
    }
}

impl fmt::Display for FilterDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(k, v)| format!("{}={}", k, display(v)))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Search,
    Select,
    Sort,
}

/// One declared filter: a descriptor restricted to search/select/sort, plus its default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterField {
    #[serde(flatten)]
    pub descriptor: FieldDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl FilterField {
    pub fn search(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::from_descriptor(FieldDescriptor::new(key, FieldType::Search, label))
    }

    pub fn select(key: impl Into<String>, label: impl Into<String>, options: Vec<OptionItem>) -> Self {
        Self::from_descriptor(FieldDescriptor::new(key, FieldType::Select, label).options(options))
    }

    pub fn sort(key: impl Into<String>, label: impl Into<String>, options: Vec<OptionItem>) -> Self {
        Self::from_descriptor(FieldDescriptor::new(key, FieldType::Sort, label).options(options))
    }

    pub fn from_descriptor(descriptor: FieldDescriptor) -> Self {
        Self {
            descriptor,
            default: None,
        }
    }

    pub fn default_to(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.descriptor.key
    }

    pub fn kind(&self) -> FilterKind {
        match self.descriptor.field_type {
            FieldType::Search => FilterKind::Search,
            FieldType::Sort => FilterKind::Sort,
            _ => FilterKind::Select,
        }
    }

    pub fn default_value(&self) -> Value {
        if let Some(value) = &self.default {
            return value.clone();
        }
        match self.kind() {
            FilterKind::Search => Value::String(String::new()),
            FilterKind::Select => Value::String(SELECT_ALL.to_string()),
            FilterKind::Sort => self
                .descriptor
                .options
                .first()
                .map(|o| Value::String(o.value.clone()))
                .unwrap_or_else(|| Value::String(String::new())),
        }
    }

    pub fn is_default(&self, value: &Value) -> bool {
        value.is_null() || loosely_equal(value, &self.default_value())
    }
}

/// A named group of filter keys for compact presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterTab {
    pub label: String,
    pub filters: Vec<String>,
}

/// A removable token for one non-default filter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveFilter {
    pub kind: FilterKind,
    pub key: String,
    pub value: Value,
    pub label: String,
    pub tone: Tone,
    /// Restores this one filter to its default.
    pub removal: FilterDelta,
}

/// Decides which filters count as active for a schema.
pub trait ActiveFilterRules: Send + Sync {
    fn active_filters(&self, schema: &FilterSchema, values: &FilterValues) -> Vec<ActiveFilter>;

    fn has_active_filters(&self, schema: &FilterSchema, values: &FilterValues) -> bool {
        !self.active_filters(schema, values).is_empty()
    }
}

/// Any declared filter whose value differs from its default, except `sortOrder`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRules;

impl ActiveFilterRules for DefaultRules {
    fn active_filters(&self, schema: &FilterSchema, values: &FilterValues) -> Vec<ActiveFilter> {
        schema
            .fields
            .iter()
            .filter(|field| field.key() != SORT_ORDER_KEY)
            .filter_map(|field| {
                let value = values.get(field.key());
                if field.is_default(value) {
                    None
                } else {
                    Some(default_chip(field, value))
                }
            })
            .collect()
    }

    fn has_active_filters(&self, schema: &FilterSchema, values: &FilterValues) -> bool {
        schema
            .fields
            .iter()
            .filter(|field| field.key() != SORT_ORDER_KEY)
            .any(|field| !field.is_default(values.get(field.key())))
    }
}

fn default_chip(field: &FilterField, value: &Value) -> ActiveFilter {
    let descriptor = &field.descriptor;
    let option = descriptor.find_option(value);
    let shown = option
        .map(|o| o.label.clone())
        .unwrap_or_else(|| display(value));

    let (label, tone) = match field.kind() {
        FilterKind::Search => (format!("Search: {}", shown), Tone::Blue),
        FilterKind::Select => (
            format!("{}: {}", descriptor.display_label(), shown),
            option.map(OptionItem::tone).unwrap_or_default(),
        ),
        FilterKind::Sort => (format!("Sort: {}", shown), Tone::Neutral),
    };

    ActiveFilter {
        kind: field.kind(),
        key: descriptor.key.clone(),
        value: value.clone(),
        label,
        tone,
        removal: FilterDelta::single(descriptor.key.clone(), field.default_value()),
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct FilterSchema {
    #[serde(default)]
    pub fields: Vec<FilterField>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tabs: Vec<FilterTab>,
    #[serde(skip)]
    pub rules: Option<Arc<dyn ActiveFilterRules>>,
}

impl fmt::Debug for FilterSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSchema")
            .field("fields", &self.fields)
            .field("tabs", &self.tabs)
            .field("rules", &self.rules.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

impl FilterSchema {
    pub fn new(fields: Vec<FilterField>) -> Self {
        Self {
            fields,
            tabs: Vec::new(),
            rules: None,
        }
    }

    pub fn tab(mut self, label: impl Into<String>, filters: &[&str]) -> Self {
        self.tabs.push(FilterTab {
            label: label.into(),
            filters: filters.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    pub fn with_rules(mut self, rules: impl ActiveFilterRules + 'static) -> Self {
        self.rules = Some(Arc::new(rules));
        self
    }

    pub fn field(&self, key: &str) -> Option<&FilterField> {
        self.fields.iter().find(|f| f.key() == key)
    }

    /// Every declared filter at its default.
    pub fn default_values(&self) -> FilterValues {
        self.fields
            .iter()
            .map(|f| (f.key().to_string(), f.default_value()))
            .collect()
    }

    pub fn has_active_filters(&self, values: &FilterValues) -> bool {
        match &self.rules {
            Some(rules) => rules.has_active_filters(self, values),
            None => DefaultRules.has_active_filters(self, values),
        }
    }

    pub fn active_filters(&self, values: &FilterValues) -> Vec<ActiveFilter> {
        match &self.rules {
            Some(rules) => rules.active_filters(self, values),
            None => DefaultRules.active_filters(self, values),
        }
    }

    /// One delta restoring every declared filter to its default.
    pub fn clear_all(&self) -> FilterDelta {
        FilterDelta(self.default_values().0)
    }

    pub fn change(&self, key: &str, value: impl Into<Value>) -> FilterDelta {
        FilterDelta::single(key, value)
    }

    pub fn violations(&self, location: &str) -> Vec<ConfigViolation> {
        let mut found = Vec::new();
        let mut seen = HashSet::new();

        for field in &self.fields {
            let here = format!("{}.{}", location, field.key());
            if !field.descriptor.field_type.is_filter() {
                found.push(ConfigViolation::new(
                    &here,
                    format!(
                        "'{}' is not a filter type (expected search, select or sort)",
                        field.descriptor.field_type.tag()
                    ),
                ));
            }
            if field.key().is_empty() {
                found.push(ConfigViolation::new(location, "filter has an empty key"));
            }
            if !seen.insert(field.key()) {
                found.push(ConfigViolation::new(&here, "duplicate filter key"));
            }
            if field.kind() != FilterKind::Search && field.descriptor.options.is_empty() {
                found.push(ConfigViolation::new(&here, "filter declares no options"));
            }
        }

        for tab in &self.tabs {
            for key in &tab.filters {
                if self.field(key).is_none() {
                    found.push(ConfigViolation::new(
                        format!("{}.tabs.{}", location, tab.label),
                        format!("tab references unknown filter '{}'", key),
                    ));
                }
            }
        }
        found
    }

    /// View model for the filter bar.
    pub fn bar(&self, values: &FilterValues, surface: FilterSurface, open: bool) -> FilterBarView {
        let controls = self
            .fields
            .iter()
            .map(|field| {
                let value = values.get(field.key());
                FilterControl {
                    key: field.key().to_string(),
                    kind: field.kind(),
                    label: field.descriptor.display_label().to_string(),
                    value: if value.is_null() {
                        field.default_value()
                    } else {
                        value.clone()
                    },
                    placeholder: field.descriptor.placeholder.clone(),
                    options: field.descriptor.options.clone(),
                    is_default: field.is_default(value),
                }
            })
            .collect();
        let chips = self.active_filters(values);
        let has_active = self.has_active_filters(values);

        FilterBarView {
            surface,
            open,
            controls,
            tabs: self.tabs.clone(),
            chips,
            has_active,
            sort_order: match values.get(SORT_ORDER_KEY) {
                Value::Null => None,
                value => Some(display(value)),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterControl {
    pub key: String,
    pub kind: FilterKind,
    pub label: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub options: Vec<OptionItem>,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterBarView {
    pub surface: FilterSurface,
    /// Whether the sheet (mobile) or expandable panel (tablet/desktop) is open.
    pub open: bool,
    pub controls: Vec<FilterControl>,
    pub tabs: Vec<FilterTab>,
    pub chips: Vec<ActiveFilter>,
    /// Drives the "clear all" affordance.
    pub has_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> FilterSchema {
        FilterSchema::new(vec![
            FilterField::search("search", "Search"),
            FilterField::select(
                "status",
                "Status",
                vec![
                    OptionItem::new("all", "All"),
                    OptionItem::new("active", "Active").color("green"),
                    OptionItem::new("archived", "Archived").color("gray"),
                ],
            ),
            FilterField::sort(
                "sortBy",
                "Sort by",
                vec![
                    OptionItem::new("createdAt", "Newest"),
                    OptionItem::new("price", "Price"),
                ],
            ),
        ])
    }

    #[test]
    fn defaults_are_not_active() {
        let values = FilterValues::new()
            .with("search", "")
            .with("status", "all")
            .with("sortOrder", "desc");
        assert!(!schema().has_active_filters(&values));
        assert!(schema().active_filters(&values).is_empty());
    }

    #[test]
    fn search_term_produces_one_chip() {
        let values = FilterValues::new().with("search", "shoe").with("status", "all");
        let schema = schema();
        assert!(schema.has_active_filters(&values));

        let chips = schema.active_filters(&values);
        assert_eq!(chips.len(), 1);
        assert_eq!(chips[0].kind, FilterKind::Search);
        assert_eq!(chips[0].label, "Search: shoe");
        assert_eq!(chips[0].removal, FilterDelta::single("search", ""));
    }

    #[test]
    fn select_chip_uses_option_label_and_tone() {
        let values = FilterValues::new().with("status", "active");
        let chips = schema().active_filters(&values);
        assert_eq!(chips[0].label, "Status: Active");
        assert_eq!(chips[0].tone, Tone::Green);
    }

    #[test]
    fn sort_order_never_counts() {
        let values = FilterValues::new().with("sortOrder", "asc");
        assert!(!schema().has_active_filters(&values));
    }

    #[test]
    fn sort_by_defaults_to_first_option() {
        let schema = schema();
        assert_eq!(schema.field("sortBy").unwrap().default_value(), json!("createdAt"));
        let chips = schema.active_filters(&FilterValues::new().with("sortBy", "price"));
        assert_eq!(chips[0].label, "Sort: Price");
    }

    #[test]
    fn removing_a_chip_restores_only_that_filter() {
        let schema = schema();
        let values = FilterValues::new()
            .with("search", "shoe")
            .with("status", "active")
            .with("sortOrder", "asc");
        let chips = schema.active_filters(&values);
        let status_chip = chips.iter().find(|c| c.key == "status").unwrap();

        let next = status_chip.removal.apply_to(&values);
        assert_eq!(next.get("status"), &json!("all"));
        assert_eq!(next.get("search"), &json!("shoe"));
        assert_eq!(next.get("sortOrder"), &json!("asc"));

        // removing again changes nothing
        assert_eq!(status_chip.removal.apply_to(&next), next);
    }

    #[test]
    fn clear_all_restores_every_default() {
        let schema = schema();
        let values = FilterValues::new()
            .with("search", "shoe")
            .with("status", "active")
            .with("sortBy", "price");
        let cleared = schema.clear_all().apply_to(&values);
        assert_eq!(cleared, schema.default_values());
        assert!(!schema.has_active_filters(&cleared));
    }

    #[test]
    fn values_compare_loosely() {
        let schema = FilterSchema::new(vec![FilterField::select(
            "rating",
            "Rating",
            vec![OptionItem::new("5", "Five")],
        )
        .default_to(5)]);
        assert!(!schema.has_active_filters(&FilterValues::new().with("rating", "5")));
    }

    struct SearchOnly;

    impl ActiveFilterRules for SearchOnly {
        fn active_filters(&self, schema: &FilterSchema, values: &FilterValues) -> Vec<ActiveFilter> {
            DefaultRules
                .active_filters(schema, values)
                .into_iter()
                .filter(|chip| chip.kind == FilterKind::Search)
                .collect()
        }
    }

    #[test]
    fn custom_rules_override_defaults() {
        let schema = schema().with_rules(SearchOnly);
        let values = FilterValues::new().with("status", "active");
        assert!(!schema.has_active_filters(&values));
        assert!(schema.has_active_filters(&values.clone().with("search", "x")));
    }

    #[test]
    fn schema_from_json() {
        let schema: FilterSchema = serde_json::from_value(json!({
            "fields": [
                { "key": "search", "type": "search", "label": "Search", "placeholder": "Find…" },
                { "key": "category", "type": "select", "label": "Category", "default": "any",
                  "options": [{ "value": "any", "label": "Any" }, { "value": "shoes", "label": "Shoes" }] }
            ],
            "tabs": [{ "label": "Main", "filters": ["search", "category"] }]
        }))
        .unwrap();
        assert_eq!(schema.field("category").unwrap().default_value(), json!("any"));
        assert!(schema.violations("filters").is_empty());
    }

    #[test]
    fn violations_catch_bad_filters() {
        let schema = FilterSchema::new(vec![
            FilterField::from_descriptor(FieldDescriptor::text("name", "Name")),
            FilterField::search("q", "Search"),
            FilterField::search("q", "Again"),
        ])
        .tab("More", &["missing"]);
        let found = schema.violations("filters");
        assert_eq!(found.len(), 4);
    }

    #[test]
    fn bar_view_reflects_values() {
        let values = FilterValues::new().with("search", "shoe").with("sortOrder", "asc");
        let bar = schema().bar(&values, FilterSurface::BottomSheet, true);
        assert_eq!(bar.controls.len(), 3);
        assert!(!bar.controls[0].is_default);
        assert_eq!(bar.controls[1].value, json!("all"));
        assert!(bar.has_active);
        assert_eq!(bar.sort_order.as_deref(), Some("asc"));
    }
}
