//! # Detail/Edit Panel
//!
//! A tabbed view of one record. Tabs hold sections, sections hold field
//! descriptors and lay them out as a grid of labeled cards or a vertical list.
//!
//! ## States
//!
//! ```text
//!            toggle_edit               begin_save
//!  Viewing ─────────────▶ Editing ─────────────────▶ Saving
//!     ▲  ◀───────────────   │  ▲                       │
//!     │   toggle/cancel     │  └── host rejected ──────┤
//!     └─────────────────────┴───── host accepted ──────┘
//! ```
//!
//! Entering `Editing` seeds a buffer with a copy of the record. Edits go to
//! the buffer only; the record the panel was opened with is never touched.
//! A successful save discards the buffer and returns to `Viewing`, and the
//! host supplies the authoritative record through [`DetailPanel::refresh`].
//!
//! `Saving` gates every transition: toggling, cancelling, editing and a
//! second save are all refused with [`PanelError::SaveInFlight`]. A rejected
//! save returns to `Editing` with the buffer intact so the user can retry or
//! cancel.

use crate::descriptor::{EditorKind, FieldDescriptor, FieldType, OptionItem};
use crate::error::{ConfigViolation, PanelError};
use crate::record::{assign, display, lookup, record_id};
use crate::render::{Cell, RendererRegistry};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::future::Future;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionLayout {
    /// Responsive grid of labeled field cards.
    #[default]
    Grid,
    /// One field per row.
    List,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub layout: SectionLayout,
    pub fields: Vec<FieldDescriptor>,
}

impl Section {
    pub fn new(title: Option<&str>, layout: SectionLayout, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            title: title.map(str::to_string),
            layout,
            fields,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailTab {
    pub id: String,
    pub label: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailSchema {
    /// Key path shown as the panel heading. Falls back to the record id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub tabs: Vec<DetailTab>,
}

impl DetailSchema {
    pub fn new(tabs: Vec<DetailTab>) -> Self {
        Self { title: None, tabs }
    }

    /// A single "Details" tab showing every column except row actions.
    pub fn from_columns(columns: &[FieldDescriptor]) -> Self {
        let fields = columns
            .iter()
            .filter(|c| c.field_type != FieldType::Action)
            .cloned()
            .collect();
        Self::new(vec![DetailTab {
            id: "details".to_string(),
            label: "Details".to_string(),
            sections: vec![Section::new(None, SectionLayout::Grid, fields)],
        }])
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.tabs
            .iter()
            .flat_map(|tab| tab.sections.iter())
            .flat_map(|section| section.fields.iter())
    }

    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields().find(|f| f.key == key)
    }

    pub fn violations(&self, location: &str) -> Vec<ConfigViolation> {
        let mut found = Vec::new();
        for tab in &self.tabs {
            let here = format!("{}.{}", location, tab.id);
            if tab.id.is_empty() {
                found.push(ConfigViolation::new(location, "detail tab has an empty id"));
            }
            if tab.sections.iter().all(|s| s.fields.is_empty()) {
                found.push(ConfigViolation::new(&here, "detail tab has no fields"));
            }
            for section in &tab.sections {
                for field in &section.fields {
                    found.extend(field.violations(&here));
                }
            }
        }
        found
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelMode {
    Viewing,
    Editing { buffer: Value },
    Saving { buffer: Value },
}

impl PanelMode {
    pub fn name(&self) -> &'static str {
        match self {
            PanelMode::Viewing => "viewing",
            PanelMode::Editing { .. } => "editing",
            PanelMode::Saving { .. } => "saving",
        }
    }
}

/// Full replacement for the default panel view.
pub trait DetailRenderer: Send + Sync {
    fn render(&self, panel: &DetailPanel, registry: &RendererRegistry) -> PanelView;
}

impl<F> DetailRenderer for F
where
    F: Fn(&DetailPanel, &RendererRegistry) -> PanelView + Send + Sync,
{
    fn render(&self, panel: &DetailPanel, registry: &RendererRegistry) -> PanelView {
        self(panel, registry)
    }
}

/// Puts a panel left in `Saving` back into `Editing` when a save future is dropped.
struct SaveGuard<'a> {
    panel: &'a mut DetailPanel,
    settled: bool,
}

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        if !self.settled && self.panel.is_saving() {
            let _ = self.panel.abort_save();
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetailPanel {
    schema: DetailSchema,
    record: Value,
    mode: PanelMode,
    active_tab: usize,
}

impl DetailPanel {
    pub fn open(schema: DetailSchema, record: Value) -> Self {
        tracing::debug!(id = ?record_id(&record), "detail panel opened");
        Self {
            schema,
            record,
            mode: PanelMode::Viewing,
            active_tab: 0,
        }
    }

    pub fn record(&self) -> &Value {
        &self.record
    }

    pub fn record_id(&self) -> Option<String> {
        record_id(&self.record)
    }

    pub fn schema(&self) -> &DetailSchema {
        &self.schema
    }

    pub fn mode(&self) -> &PanelMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, PanelMode::Editing { .. })
    }

    pub fn is_saving(&self) -> bool {
        matches!(self.mode, PanelMode::Saving { .. })
    }

    pub fn buffer(&self) -> Option<&Value> {
        match &self.mode {
            PanelMode::Viewing => None,
            PanelMode::Editing { buffer } | PanelMode::Saving { buffer } => Some(buffer),
        }
    }

    pub fn active_tab(&self) -> Option<&DetailTab> {
        self.schema.tabs.get(self.active_tab)
    }

    /// Switches between viewing and editing. Returns whether the panel is now editing.
    ///
    /// Leaving edit mode this way discards the buffer, like [`cancel`](Self::cancel).
    pub fn toggle_edit(&mut self) -> Result<bool, PanelError> {
        let next = match &self.mode {
            PanelMode::Viewing => PanelMode::Editing {
                buffer: self.record.clone(),
            },
            PanelMode::Editing { .. } => PanelMode::Viewing,
            PanelMode::Saving { .. } => return Err(PanelError::SaveInFlight),
        };
        self.transition(next);
        Ok(self.is_editing())
    }

    /// Writes a value into the edit buffer.
    pub fn set_field(&mut self, key: &str, value: Value) -> Result<(), PanelError> {
        let editable = self
            .schema
            .field(key)
            .and_then(FieldDescriptor::editor_kind)
            .is_some();
        match &mut self.mode {
            PanelMode::Viewing => Err(PanelError::NotEditing),
            PanelMode::Saving { .. } => Err(PanelError::SaveInFlight),
            PanelMode::Editing { .. } if !editable => Err(PanelError::ReadOnly(key.to_string())),
            PanelMode::Editing { buffer } => {
                assign(buffer, key, value);
                Ok(())
            }
        }
    }

    /// Like [`set_field`](Self::set_field), converting raw input text for the field's editor.
    pub fn set_input(&mut self, key: &str, raw: &str) -> Result<(), PanelError> {
        let kind = self.schema.field(key).and_then(FieldDescriptor::editor_kind);
        let value = match kind {
            Some(kind) => input_value(kind, raw),
            None => return Err(PanelError::ReadOnly(key.to_string())),
        };
        self.set_field(key, value)
    }

    /// Discards the buffer and returns to viewing. A no-op when already viewing.
    pub fn cancel(&mut self) -> Result<(), PanelError> {
        match self.mode {
            PanelMode::Saving { .. } => Err(PanelError::SaveInFlight),
            PanelMode::Viewing => Ok(()),
            PanelMode::Editing { .. } => {
                self.transition(PanelMode::Viewing);
                Ok(())
            }
        }
    }

    /// Moves to `Saving` and hands out the buffered record for the host to persist.
    pub fn begin_save(&mut self) -> Result<Value, PanelError> {
        let buffer = match &self.mode {
            PanelMode::Viewing => return Err(PanelError::NotEditing),
            PanelMode::Saving { .. } => return Err(PanelError::SaveInFlight),
            PanelMode::Editing { buffer } => buffer.clone(),
        };
        self.transition(PanelMode::Saving {
            buffer: buffer.clone(),
        });
        Ok(buffer)
    }

    /// Resolves an in-flight save with the host's outcome.
    pub fn finish_save<E: fmt::Display>(&mut self, outcome: Result<(), E>) -> Result<(), PanelError> {
        let buffer = match std::mem::replace(&mut self.mode, PanelMode::Viewing) {
            PanelMode::Saving { buffer } => buffer,
            other => {
                self.mode = other;
                return Err(PanelError::NotEditing);
            }
        };
        match outcome {
            Ok(()) => {
                tracing::debug!(id = ?self.record_id(), "save accepted");
                Ok(())
            }
            Err(err) => {
                tracing::debug!(id = ?self.record_id(), error = %err, "save rejected");
                self.mode = PanelMode::Editing { buffer };
                Err(PanelError::Host(err.to_string()))
            }
        }
    }

    /// Gives up on an in-flight save and returns to editing with the buffer intact.
    pub fn abort_save(&mut self) -> Result<(), PanelError> {
        match std::mem::replace(&mut self.mode, PanelMode::Viewing) {
            PanelMode::Saving { buffer } => {
                tracing::debug!(id = ?self.record_id(), "save abandoned");
                self.mode = PanelMode::Editing { buffer };
                Ok(())
            }
            other => {
                self.mode = other;
                Err(PanelError::NotEditing)
            }
        }
    }

    /// Hands the buffer to `on_save`, awaits it, and settles the panel.
    ///
    /// Dropping the returned future before it completes aborts the save.
    pub async fn save<F, Fut, E>(&mut self, on_save: F) -> Result<(), PanelError>
    where
        F: FnOnce(Value) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: fmt::Display,
    {
        let buffer = self.begin_save()?;
        let mut guard = SaveGuard {
            panel: self,
            settled: false,
        };
        let outcome = on_save(buffer).await;
        guard.settled = true;
        guard.panel.finish_save(outcome)
    }

    /// Selects a tab by id. Unknown ids leave the selection alone.
    pub fn select_tab(&mut self, id: &str) -> bool {
        match self.schema.tabs.iter().position(|tab| tab.id == id) {
            Some(index) => {
                self.active_tab = index;
                true
            }
            None => false,
        }
    }

    /// Replaces the record with the host's latest copy. An open buffer is kept.
    pub fn refresh(&mut self, record: Value) {
        self.record = record;
    }

    fn transition(&mut self, next: PanelMode) {
        tracing::debug!(from = self.mode.name(), to = next.name(), "panel transition");
        self.mode = next;
    }

    pub fn view(&self, registry: &RendererRegistry) -> PanelView {
        let saving = self.is_saving();
        let source = self.buffer().unwrap_or(&self.record);

        let tabs = self
            .schema
            .tabs
            .iter()
            .enumerate()
            .map(|(i, tab)| TabHeader {
                id: tab.id.clone(),
                label: tab.label.clone(),
                active: i == self.active_tab,
            })
            .collect();

        let sections = self
            .active_tab()
            .map(|tab| {
                tab.sections
                    .iter()
                    .map(|section| SectionView {
                        title: section.title.clone(),
                        layout: section.layout,
                        fields: section
                            .fields
                            .iter()
                            .map(|field| FieldView {
                                key: field.key.clone(),
                                label: field.display_label().to_string(),
                                content: self.field_content(field, source, registry, saving),
                            })
                            .collect(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let title = self
            .schema
            .title
            .as_deref()
            .map(|key| display(lookup(&self.record, key)))
            .filter(|t| !t.is_empty())
            .or_else(|| self.record_id())
            .unwrap_or_default();

        PanelView {
            title,
            record_id: self.record_id(),
            mode: self.mode.name().to_string(),
            loading: saving,
            tabs,
            sections,
            can_toggle_edit: !saving,
            save_enabled: self.is_editing(),
            cancel_enabled: self.is_editing(),
        }
    }

    fn field_content(
        &self,
        field: &FieldDescriptor,
        source: &Value,
        registry: &RendererRegistry,
        saving: bool,
    ) -> FieldContent {
        match (&self.mode, field.editor_kind()) {
            (PanelMode::Viewing, _) | (_, None) => FieldContent::Display {
                cell: registry.render(source, field),
            },
            (_, Some(kind)) => FieldContent::Editor(EditorControl {
                kind,
                value: lookup(source, &field.key).clone(),
                options: match kind {
                    EditorKind::Select => field.options.clone(),
                    _ => Vec::new(),
                },
                placeholder: field.placeholder.clone(),
                disabled: saving,
            }),
        }
    }
}

/// Converts raw text typed into an editor into the value stored in the buffer.
pub fn input_value(kind: EditorKind, raw: &str) -> Value {
    match kind {
        EditorKind::Number => {
            let trimmed = raw.trim();
            if let Ok(n) = trimmed.parse::<i64>() {
                return Value::Number(n.into());
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(raw.to_string()))
        }
        _ => Value::String(raw.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorControl {
    pub kind: EditorKind,
    pub value: Value,
    pub options: Vec<OptionItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldContent {
    Display { cell: Cell },
    Editor(EditorControl),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub key: String,
    pub label: String,
    pub content: FieldContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub layout: SectionLayout,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabHeader {
    pub id: String,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    pub mode: String,
    /// Blocking indicator while a save is in flight.
    pub loading: bool,
    pub tabs: Vec<TabHeader>,
    pub sections: Vec<SectionView>,
    pub can_toggle_edit: bool,
    pub save_enabled: bool,
    pub cancel_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    fn schema() -> DetailSchema {
        DetailSchema {
            title: Some("name".into()),
            tabs: vec![
                DetailTab {
                    id: "overview".into(),
                    label: "Overview".into(),
                    sections: vec![Section::new(
                        Some("Basics"),
                        SectionLayout::Grid,
                        vec![
                            FieldDescriptor::text("id", "ID"),
                            FieldDescriptor::text("name", "Name"),
                            FieldDescriptor::new("price", FieldType::Currency, "Price"),
                            FieldDescriptor::new("status", FieldType::Badge, "Status").options(vec![
                                OptionItem::new("active", "Active").color("green"),
                                OptionItem::new("draft", "Draft"),
                            ]),
                        ],
                    )],
                },
                DetailTab {
                    id: "shipping".into(),
                    label: "Shipping".into(),
                    sections: vec![Section::new(
                        None,
                        SectionLayout::List,
                        vec![
                            FieldDescriptor::text("shipping.city", "City"),
                            FieldDescriptor::new("createdAt", FieldType::Date, "Created").readonly(),
                        ],
                    )],
                },
            ],
        }
    }

    fn record() -> Value {
        json!({
            "id": 7, "name": "Runner", "price": 80, "status": "draft",
            "shipping": { "city": "Porto" }, "createdAt": "2024-01-05"
        })
    }

    fn panel() -> DetailPanel {
        DetailPanel::open(schema(), record())
    }

    #[test]
    fn toggle_edit_seeds_buffer() {
        let mut panel = panel();
        assert_eq!(panel.toggle_edit(), Ok(true));
        assert_eq!(panel.buffer(), Some(&record()));
        assert_eq!(panel.toggle_edit(), Ok(false));
        assert!(panel.buffer().is_none());
    }

    #[test]
    fn cancel_leaves_record_untouched() {
        let mut panel = panel();
        let before = serde_json::to_vec(panel.record()).unwrap();

        panel.toggle_edit().unwrap();
        panel.set_field("name", json!("Trail Runner")).unwrap();
        panel.set_field("shipping.city", json!("Lisbon")).unwrap();
        assert_eq!(panel.buffer().unwrap()["name"], json!("Trail Runner"));

        panel.cancel().unwrap();
        assert_eq!(panel.mode(), &PanelMode::Viewing);
        assert_eq!(serde_json::to_vec(panel.record()).unwrap(), before);
    }

    #[test]
    fn successful_save_clears_buffer() {
        let mut panel = panel();
        panel.toggle_edit().unwrap();
        panel.set_field("name", json!("Trail Runner")).unwrap();

        let mut saved = None;
        let result = block_on(panel.save(|data| {
            saved = Some(data);
            async { Ok::<(), String>(()) }
        }));

        assert_eq!(result, Ok(()));
        assert_eq!(panel.mode(), &PanelMode::Viewing);
        assert!(panel.buffer().is_none());
        assert_eq!(saved.unwrap()["name"], json!("Trail Runner"));
        // the host provides the new record
        assert_eq!(panel.record()["name"], json!("Runner"));
    }

    #[test]
    fn rejected_save_keeps_buffer() {
        let mut panel = panel();
        panel.toggle_edit().unwrap();
        panel.set_field("price", json!(95)).unwrap();

        let result = block_on(panel.save(|_| async { Err::<(), _>("conflict") }));

        assert_eq!(result, Err(PanelError::Host("conflict".into())));
        assert!(panel.is_editing());
        assert_eq!(panel.buffer().unwrap()["price"], json!(95));
    }

    #[test]
    fn saving_gates_every_transition() {
        let mut panel = panel();
        panel.toggle_edit().unwrap();
        let buffer = panel.begin_save().unwrap();
        assert_eq!(buffer, record());

        assert_eq!(panel.begin_save(), Err(PanelError::SaveInFlight));
        assert_eq!(panel.toggle_edit(), Err(PanelError::SaveInFlight));
        assert_eq!(panel.cancel(), Err(PanelError::SaveInFlight));
        assert_eq!(
            panel.set_field("name", json!("x")),
            Err(PanelError::SaveInFlight)
        );
        assert!(panel.view(&RendererRegistry::default()).loading);

        panel.finish_save(Ok::<(), String>(())).unwrap();
        assert_eq!(panel.mode(), &PanelMode::Viewing);
    }

    #[test]
    fn dropped_save_returns_to_editing() {
        use futures::future::{self, FutureExt};

        let mut panel = panel();
        panel.toggle_edit().unwrap();
        panel.set_field("name", json!("Trail Runner")).unwrap();

        let pending = panel.save(|_| future::pending::<Result<(), String>>());
        assert!(pending.now_or_never().is_none());

        assert!(panel.is_editing());
        assert_eq!(panel.buffer().unwrap()["name"], json!("Trail Runner"));
        assert_eq!(panel.cancel(), Ok(()));
    }

    #[test]
    fn abort_save_keeps_buffer() {
        let mut panel = panel();
        assert_eq!(panel.abort_save(), Err(PanelError::NotEditing));

        panel.toggle_edit().unwrap();
        panel.set_field("price", json!(95)).unwrap();
        panel.begin_save().unwrap();
        panel.abort_save().unwrap();

        assert!(panel.is_editing());
        assert_eq!(panel.buffer().unwrap()["price"], json!(95));
        assert_eq!(panel.abort_save(), Err(PanelError::NotEditing));
    }

    #[test]
    fn edits_require_edit_mode() {
        let mut panel = panel();
        assert_eq!(panel.set_field("name", json!("x")), Err(PanelError::NotEditing));
        assert_eq!(panel.begin_save(), Err(PanelError::NotEditing));
        assert_eq!(panel.cancel(), Ok(()));
        assert_eq!(
            panel.finish_save(Ok::<(), String>(())),
            Err(PanelError::NotEditing)
        );
    }

    #[test]
    fn readonly_fields_are_refused() {
        let mut panel = panel();
        panel.toggle_edit().unwrap();
        assert_eq!(
            panel.set_field("id", json!(8)),
            Err(PanelError::ReadOnly("id".into()))
        );
        assert_eq!(
            panel.set_field("createdAt", json!("2025-01-01")),
            Err(PanelError::ReadOnly("createdAt".into()))
        );
        assert_eq!(
            panel.set_field("unknown", json!(1)),
            Err(PanelError::ReadOnly("unknown".into()))
        );
    }

    #[test]
    fn set_input_coerces_numbers() {
        let mut panel = panel();
        panel.toggle_edit().unwrap();
        panel.set_input("price", "95.5").unwrap();
        panel.set_input("name", "42").unwrap();
        assert_eq!(panel.buffer().unwrap()["price"], json!(95.5));
        assert_eq!(panel.buffer().unwrap()["name"], json!("42"));
    }

    #[test]
    fn view_in_viewing_mode_renders_cells() {
        let view = panel().view(&RendererRegistry::default());
        assert_eq!(view.title, "Runner");
        assert_eq!(view.mode, "viewing");
        assert_eq!(view.tabs.len(), 2);
        assert!(view.tabs[0].active);

        let fields = &view.sections[0].fields;
        assert_eq!(fields.len(), 4);
        assert!(matches!(
            &fields[2].content,
            FieldContent::Display { cell } if cell.plain_text() == "$80.00"
        ));
        assert!(!view.save_enabled);
    }

    #[test]
    fn view_in_editing_mode_shows_editors() {
        let mut panel = panel();
        panel.toggle_edit().unwrap();
        panel.set_field("status", json!("active")).unwrap();
        let view = panel.view(&RendererRegistry::default());

        let fields = &view.sections[0].fields;
        assert!(matches!(fields[0].content, FieldContent::Display { .. }));
        match &fields[3].content {
            FieldContent::Editor(control) => {
                assert_eq!(control.kind, EditorKind::Select);
                assert_eq!(control.value, json!("active"));
                assert_eq!(control.options.len(), 2);
            }
            other => panic!("expected an editor, got {:?}", other),
        }
        assert!(view.save_enabled);
    }

    #[test]
    fn tabs_switch_sections() {
        let mut panel = panel();
        assert!(panel.select_tab("shipping"));
        assert!(!panel.select_tab("billing"));

        let view = panel.view(&RendererRegistry::default());
        assert_eq!(view.sections[0].layout, SectionLayout::List);
        assert_eq!(view.sections[0].fields[0].label, "City");
    }

    #[test]
    fn from_columns_skips_actions() {
        let columns = vec![
            FieldDescriptor::text("name", "Name"),
            FieldDescriptor::new("actions", FieldType::Action, "")
                .options(vec![OptionItem::new("view", "View")]),
        ];
        let schema = DetailSchema::from_columns(&columns);
        assert_eq!(schema.fields().count(), 1);
        assert!(schema.violations("detail").is_empty());
    }

    #[test]
    fn refresh_replaces_record() {
        let mut panel = panel();
        panel.refresh(json!({ "id": 7, "name": "Trail Runner" }));
        assert_eq!(panel.view(&RendererRegistry::default()).title, "Trail Runner");
    }
}
