//! # Data Sources
//!
//! The engine never searches, filters, sorts or pages records itself. That is
//! the job of the host's data collaborator, abstracted as [`DataSource`].
//!
//! [`MemorySource`] is a complete in-memory implementation over a JSON array,
//! used by the `vitrine` binary and by tests. It interprets filter values the
//! way a typical list API would:
//!
//! - **search** filters match a case-insensitive substring against every
//!   string and number leaf of the record
//! - **select** filters (and any undeclared key) match by loose equality on
//!   the key path; `"all"`, empty and default values do not restrict
//! - the **sort** filter names the key to order by, `sortOrder` is `asc` or
//!   `desc`; numbers order numerically, other values case-insensitively, and
//!   absent values always sort last
//! - results are sliced into the requested page; out-of-range pages clamp

use crate::error::{Result, VitrineError};
use crate::filters::{FilterKind, FilterSchema, FilterValues, SELECT_ALL, SORT_ORDER_KEY};
use crate::pagination::PaginationState;
use crate::record::{as_number, display, lookup, loosely_equal, record_id};
use serde_json::Value;
use std::cmp::Ordering;
use std::fs;
use std::path::Path;

/// What the host asks its data source for.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub filters: FilterValues,
    pub page: u32,
    pub limit: u32,
}

impl Query {
    pub fn new(filters: FilterValues, page: u32, limit: u32) -> Self {
        Self {
            filters,
            page,
            limit,
        }
    }
}

/// One page of results plus the pagination describing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub records: Vec<Value>,
    pub pagination: PaginationState,
}

pub trait DataSource {
    /// Filter, sort and slice records for a query.
    fn fetch(&self, query: &Query) -> Result<Page>;

    /// Get a record by id
    fn get(&self, id: &str) -> Result<Value>;

    /// Replace a record, keeping its id. Returns the stored record.
    fn update(&mut self, id: &str, record: Value) -> Result<Value>;
}

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<Value>,
    schema: FilterSchema,
}

impl MemorySource {
    pub fn new(records: Vec<Value>, schema: FilterSchema) -> Self {
        Self { records, schema }
    }

    /// Loads records from a file holding a JSON array of objects.
    pub fn from_path<P: AsRef<Path>>(path: P, schema: FilterSchema) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let records = match serde_json::from_str::<Value>(&content)? {
            Value::Array(records) => records,
            _ => {
                return Err(VitrineError::Config(format!(
                    "{} does not contain a JSON array of records",
                    path.as_ref().display()
                )))
            }
        };
        Ok(Self::new(records, schema))
    }

    /// Writes all records back as a pretty-printed JSON array.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.records)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    fn matches(&self, record: &Value, filters: &FilterValues) -> bool {
        filters.iter().all(|(key, value)| {
            if key == SORT_ORDER_KEY || is_unrestricted(value) {
                return true;
            }
            match self.schema.field(key) {
                Some(field) if field.is_default(value) => true,
                Some(field) => match field.kind() {
                    FilterKind::Search => contains_text(record, &display(value).to_lowercase()),
                    FilterKind::Select => loosely_equal(lookup(record, key), value),
                    FilterKind::Sort => true,
                },
                None => loosely_equal(lookup(record, key), value),
            }
        })
    }

    /// Key to order by: the sort filter's value, or its default when unset.
    fn sort_key(&self, filters: &FilterValues) -> Option<String> {
        let field = self
            .schema
            .fields
            .iter()
            .find(|f| f.kind() == FilterKind::Sort)?;
        let key = match filters.get(field.key()) {
            Value::Null => display(&field.default_value()),
            value => display(value),
        };
        Some(key).filter(|k| !k.is_empty())
    }
}

impl DataSource for MemorySource {
    fn fetch(&self, query: &Query) -> Result<Page> {
        let mut matched: Vec<&Value> = self
            .records
            .iter()
            .filter(|record| self.matches(record, &query.filters))
            .collect();

        if let Some(sort_by) = self.sort_key(&query.filters) {
            let descending = display(query.filters.get(SORT_ORDER_KEY)).eq_ignore_ascii_case("desc");
            matched.sort_by(|a, b| compare_values(lookup(a, &sort_by), lookup(b, &sort_by), descending));
        }

        let pagination = PaginationState::new(query.page, query.limit, matched.len() as u64);
        let skip = (pagination.current_page as usize - 1) * pagination.limit as usize;
        let records = matched
            .into_iter()
            .skip(skip)
            .take(pagination.limit as usize)
            .cloned()
            .collect();

        tracing::debug!(
            page = pagination.current_page,
            total = pagination.total_count,
            "fetched page"
        );
        Ok(Page {
            records,
            pagination,
        })
    }

    fn get(&self, id: &str) -> Result<Value> {
        self.records
            .iter()
            .find(|r| record_id(r).as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| VitrineError::RecordNotFound(id.to_string()))
    }

    fn update(&mut self, id: &str, mut record: Value) -> Result<Value> {
        let slot = self
            .records
            .iter_mut()
            .find(|r| record_id(r).as_deref() == Some(id))
            .ok_or_else(|| VitrineError::RecordNotFound(id.to_string()))?;

        // the stored id wins over whatever the edit buffer carried
        if let (Value::Object(map), Some(original)) = (&mut record, slot.get("id")) {
            map.insert("id".to_string(), original.clone());
        }
        *slot = record;
        Ok(slot.clone())
    }
}

fn is_unrestricted(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty() || s.eq_ignore_ascii_case(SELECT_ALL),
        _ => false,
    }
}

fn contains_text(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        Value::Array(items) => items.iter().any(|v| contains_text(v, needle)),
        Value::Object(map) => map.values().any(|v| contains_text(v, needle)),
        _ => false,
    }
}

/// Absent values sort last in both directions.
fn compare_values(a: &Value, b: &Value, descending: bool) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }
    let ordering = match (a, b) {
        (Value::Number(_), Value::Number(_)) => as_number(a)
            .partial_cmp(&as_number(b))
            .unwrap_or(Ordering::Equal),
        _ => display(a).to_lowercase().cmp(&display(b).to_lowercase()),
    };
    if descending {
        ordering.reverse()
    } else {
        ordering
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::descriptor::OptionItem;
    use crate::filters::FilterField;
    use serde_json::json;

    pub fn product_filters() -> FilterSchema {
        FilterSchema::new(vec![
            FilterField::search("search", "Search"),
            FilterField::select(
                "status",
                "Status",
                vec![
                    OptionItem::new("all", "All"),
                    OptionItem::new("active", "Active").color("green"),
                    OptionItem::new("draft", "Draft").color("yellow"),
                    OptionItem::new("archived", "Archived").color("gray"),
                ],
            ),
            FilterField::sort(
                "sortBy",
                "Sort by",
                vec![
                    OptionItem::new("createdAt", "Date added"),
                    OptionItem::new("price", "Price"),
                    OptionItem::new("name", "Name"),
                ],
            ),
        ])
    }

    /// `count` products named `Product 1..=count`, cycling through statuses.
    pub fn products(count: usize) -> Vec<Value> {
        let statuses = ["active", "draft", "archived"];
        (1..=count)
            .map(|i| {
                json!({
                    "id": i,
                    "name": format!("Product {}", i),
                    "price": (i * 10) as f64 + 0.5,
                    "status": statuses[(i - 1) % statuses.len()],
                    "category": { "name": if i % 2 == 0 { "Shoes" } else { "Socks" } },
                    "createdAt": format!("2024-01-{:02}", (i % 28) + 1),
                })
            })
            .collect()
    }

    pub fn product_source(count: usize) -> MemorySource {
        MemorySource::new(products(count), product_filters())
    }
}
