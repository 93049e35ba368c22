//! # Explorer
//!
//! The composition root for one list screen. An [`Explorer`] binds the
//! renderer, layout, filter projection, pagination and detail panel to a
//! single [`ExplorerConfig`], and owns nothing beyond that screen:
//!
//! ```text
//!  host state ──ExplorerInput──▶ Explorer ──render()──▶ ExplorerView
//!      ▲                            │
//!      └──────── ExplorerEvent ◀────┘  (interaction methods)
//! ```
//!
//! Records, pagination and filter values are read-only input. Interaction
//! methods never change them; they return the [`ExplorerEvent`]s the host
//! should apply before supplying fresh input. The only state the explorer
//! keeps is presentational: viewport width, whether the filter surface is
//! open, and the detail panel.
//!
//! ## Lifetime
//!
//! [`Explorer::mount`] subscribes to resize and click-outside events on an
//! [`EventHub`]; [`Explorer::unmount`] (or dropping the explorer) releases
//! both subscriptions.
//!
//! ## Configuration problems
//!
//! Authored config is checked on construction. [`Explorer::new`] logs each
//! problem and carries on with fallbacks; [`Explorer::strict`] refuses to
//! build.

use crate::descriptor::{FieldDescriptor, FieldType};
use crate::error::{ConfigViolation, PanelError, Result, VitrineError};
use crate::filters::{FilterBarView, FilterDelta, FilterSchema, FilterValues};
use crate::layout::{
    Breakpoint, Breakpoints, CardView, DrawerWidth, EventHub, FilterSurface, LayoutPlan,
    MobileLayout, Presentation, Region, Subscription, UiEvent,
};
use crate::panel::{DetailPanel, DetailRenderer, DetailSchema, PanelView};
use crate::pagination::{PageRequest, PaginationController, PaginationState, PaginationView};
use crate::record::record_id;
use crate::render::{Cell, RendererRegistry};
use crate::settings::Settings;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::future::Future;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

/// Everything authored about one list screen.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerConfig {
    pub entity_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_plural: Option<String>,
    pub columns: Vec<FieldDescriptor>,
    #[serde(default)]
    pub filters: FilterSchema,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<MobileLayout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<DetailSchema>,
    #[serde(skip)]
    pub custom_detail: Option<Arc<dyn DetailRenderer>>,
}

impl fmt::Debug for ExplorerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExplorerConfig")
            .field("entity_name", &self.entity_name)
            .field("columns", &self.columns)
            .field("filters", &self.filters)
            .field("mobile", &self.mobile)
            .field("detail", &self.detail)
            .field("custom_detail", &self.custom_detail.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

impl ExplorerConfig {
    pub fn new(entity_name: impl Into<String>, columns: Vec<FieldDescriptor>) -> Self {
        Self {
            entity_name: entity_name.into(),
            entity_plural: None,
            columns,
            filters: FilterSchema::default(),
            mobile: None,
            detail: None,
            custom_detail: None,
        }
    }

    pub fn filters(mut self, filters: FilterSchema) -> Self {
        self.filters = filters;
        self
    }

    pub fn mobile(mut self, mobile: MobileLayout) -> Self {
        self.mobile = Some(mobile);
        self
    }

    pub fn detail(mut self, detail: DetailSchema) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn custom_detail(mut self, renderer: impl DetailRenderer + 'static) -> Self {
        self.custom_detail = Some(Arc::new(renderer));
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Lowercase plural noun used in messages, `products` for `Product`.
    pub fn plural(&self) -> String {
        match &self.entity_plural {
            Some(plural) => plural.clone(),
            None => format!("{}s", self.entity_name.to_lowercase()),
        }
    }

    pub fn mobile_layout(&self) -> MobileLayout {
        self.mobile
            .clone()
            .unwrap_or_else(|| MobileLayout::derive(&self.columns))
    }

    pub fn detail_schema(&self) -> DetailSchema {
        self.detail
            .clone()
            .unwrap_or_else(|| DetailSchema::from_columns(&self.columns))
    }

    pub fn violations(&self) -> Vec<ConfigViolation> {
        let mut found = Vec::new();
        if self.entity_name.is_empty() {
            found.push(ConfigViolation::new("entityName", "entity name is empty"));
        }
        if self.columns.is_empty() {
            found.push(ConfigViolation::new("columns", "no columns declared"));
        }
        for column in &self.columns {
            if column.field_type.is_filter() && column.field_type != FieldType::Select {
                found.push(ConfigViolation::new(
                    format!("columns.{}", column.key),
                    format!("'{}' is a filter type, not a column type", column.field_type.tag()),
                ));
            }
            found.extend(column.violations("columns"));
        }
        found.extend(self.filters.violations("filters"));
        if let Some(mobile) = &self.mobile {
            found.extend(mobile.violations("mobile"));
        }
        if let Some(detail) = &self.detail {
            found.extend(detail.violations("detail"));
        }
        found
    }
}

/// Host-owned state, supplied before each render.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExplorerInput {
    pub data: Vec<Value>,
    pub pagination: PaginationState,
    pub filters: FilterValues,
    pub is_loading: bool,
    /// When set, the host drives edit mode and the panel follows.
    pub is_editing: Option<bool>,
}

/// Something the host should do in response to an interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum ExplorerEvent {
    PageChange(u32),
    /// The host resets to page 1.
    PageSizeChange(u32),
    FilterChange(FilterDelta),
    ClearFilters { reset: FilterDelta },
    RowClick(Value),
    Action { action: String, record: Value },
    ToggleEdit(bool),
}

struct Viewport {
    width: u32,
    breakpoint: Breakpoint,
    filters_open: bool,
}

pub struct Explorer {
    config: ExplorerConfig,
    registry: RendererRegistry,
    breakpoints: Breakpoints,
    drawer_max_width: u32,
    pagination: PaginationController,
    mobile: MobileLayout,
    input: ExplorerInput,
    viewport: Rc<RefCell<Viewport>>,
    panel: Option<DetailPanel>,
    subscriptions: Vec<Subscription>,
}

impl Explorer {
    /// Builds an explorer, logging configuration problems instead of failing.
    pub fn new(config: ExplorerConfig, settings: &Settings) -> Self {
        for violation in config.violations() {
            tracing::warn!(%violation, entity = %config.entity_name, "explorer config problem");
        }
        Self::build(config, settings)
    }

    /// Builds an explorer, failing on the first configuration problem found.
    pub fn strict(config: ExplorerConfig, settings: &Settings) -> Result<Self> {
        let violations = config.violations();
        if !violations.is_empty() {
            return Err(violations.into());
        }
        Ok(Self::build(config, settings))
    }

    fn build(config: ExplorerConfig, settings: &Settings) -> Self {
        let breakpoints = settings.breakpoints();
        let width = breakpoints.desktop_min;
        let input = ExplorerInput {
            filters: config.filters.default_values(),
            ..Default::default()
        };
        Self {
            mobile: config.mobile_layout(),
            registry: RendererRegistry::new(settings.render_options()),
            pagination: PaginationController::new(settings.page_sizes.clone()),
            drawer_max_width: settings.drawer_max_width,
            viewport: Rc::new(RefCell::new(Viewport {
                width,
                breakpoint: breakpoints.classify(width),
                filters_open: false,
            })),
            breakpoints,
            config,
            input,
            panel: None,
            subscriptions: Vec::new(),
        }
    }

    /// Replaces the renderer registry, e.g. to add custom field types.
    pub fn with_registry(mut self, registry: RendererRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn registry_mut(&mut self) -> &mut RendererRegistry {
        &mut self.registry
    }

    pub fn input(&self) -> &ExplorerInput {
        &self.input
    }

    pub fn panel(&self) -> Option<&DetailPanel> {
        self.panel.as_ref()
    }

    // --- lifetime ---

    /// Subscribes to viewport events. Mounting again replaces the old subscriptions.
    pub fn mount(&mut self, hub: &EventHub) {
        self.subscriptions.clear();

        let viewport = Rc::clone(&self.viewport);
        let breakpoints = self.breakpoints;
        let resize = hub.subscribe(move |event| {
            if let UiEvent::Resize { width } = event {
                apply_width(&mut viewport.borrow_mut(), breakpoints, *width);
            }
        });

        let viewport = Rc::clone(&self.viewport);
        let click_outside = hub.subscribe(move |event| {
            if let UiEvent::PointerDown { region } = event {
                let mut viewport = viewport.borrow_mut();
                if viewport.filters_open && *region != Region::FilterSurface {
                    tracing::debug!(?region, "click outside closed filters");
                    viewport.filters_open = false;
                }
            }
        });

        self.subscriptions.push(resize);
        self.subscriptions.push(click_outside);
    }

    pub fn unmount(&mut self) {
        self.subscriptions.clear();
    }

    pub fn is_mounted(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Accepts fresh host state. An open panel picks up the new copy of its record.
    pub fn set_input(&mut self, input: ExplorerInput) {
        if let Some(panel) = self.panel.as_mut() {
            let open_id = panel.record_id();
            if let Some(fresh) = input
                .data
                .iter()
                .find(|r| open_id.is_some() && record_id(r) == open_id)
            {
                panel.refresh(fresh.clone());
            }
            let synced = match input.is_editing {
                Some(true) if !panel.is_editing() && !panel.is_saving() => {
                    panel.toggle_edit().map(|_| ())
                }
                Some(false) if panel.is_editing() => panel.cancel(),
                _ => Ok(()),
            };
            if let Err(err) = synced {
                tracing::warn!(error = %err, "host editing flag not applied");
            }
        }
        self.input = input;
    }

    // --- layout ---

    pub fn set_viewport_width(&mut self, width: u32) {
        apply_width(&mut self.viewport.borrow_mut(), self.breakpoints, width);
    }

    pub fn layout(&self) -> LayoutPlan {
        LayoutPlan::for_breakpoint(self.viewport.borrow().breakpoint, self.drawer_max_width)
    }

    /// Opens or closes the filter sheet/panel. Returns whether it is now open.
    pub fn toggle_filters(&mut self) -> bool {
        let mut viewport = self.viewport.borrow_mut();
        viewport.filters_open = !viewport.filters_open;
        viewport.filters_open
    }

    pub fn close_filters(&mut self) {
        self.viewport.borrow_mut().filters_open = false;
    }

    pub fn filters_open(&self) -> bool {
        self.viewport.borrow().filters_open
    }

    // --- filters ---

    pub fn change_filter(&mut self, key: &str, value: impl Into<Value>) -> ExplorerEvent {
        let delta = self.config.filters.change(key, value);
        tracing::debug!(%delta, "filter change");
        ExplorerEvent::FilterChange(delta)
    }

    /// Removes one chip. `None` when that filter is already at its default.
    pub fn remove_chip(&mut self, key: &str) -> Option<ExplorerEvent> {
        self.config
            .filters
            .active_filters(&self.input.filters)
            .into_iter()
            .find(|chip| chip.key == key)
            .map(|chip| ExplorerEvent::FilterChange(chip.removal))
    }

    /// Restores every filter to its default and collapses the mobile sheet.
    pub fn clear_filters(&mut self) -> ExplorerEvent {
        if self.layout().filter_surface == FilterSurface::BottomSheet {
            self.close_filters();
        }
        ExplorerEvent::ClearFilters {
            reset: self.config.filters.clear_all(),
        }
    }

    // --- pagination ---

    pub fn go_to_page(&self, page: u32) -> Option<ExplorerEvent> {
        self.pagination
            .go_to(&self.input.pagination, page)
            .map(page_event)
    }

    pub fn next_page(&self) -> Option<ExplorerEvent> {
        self.pagination.next(&self.input.pagination).map(page_event)
    }

    pub fn prev_page(&self) -> Option<ExplorerEvent> {
        self.pagination.prev(&self.input.pagination).map(page_event)
    }

    pub fn change_page_size(&self, limit: u32) -> Option<ExplorerEvent> {
        self.pagination
            .change_page_size(&self.input.pagination, limit)
            .map(page_event)
    }

    // --- rows ---

    /// Emits a row click and opens the record in the detail panel.
    ///
    /// While a save is in flight the click is still emitted, but the panel
    /// keeps the record being saved.
    pub fn click_row(&mut self, index: usize) -> Option<ExplorerEvent> {
        let record = self.input.data.get(index)?.clone();
        if let Err(err) = self.replace_panel(record.clone()) {
            tracing::debug!(error = %err, "row click left the panel open");
        }
        Some(ExplorerEvent::RowClick(record))
    }

    /// Fires a row action. The row click is suppressed, so the panel stays as it was.
    pub fn trigger_action(&self, index: usize, action: &str) -> Option<ExplorerEvent> {
        let record = self.input.data.get(index)?;
        let declared = self
            .config
            .columns
            .iter()
            .filter(|c| c.field_type == FieldType::Action)
            .any(|c| c.options.iter().any(|o| o.value == action));
        if !declared {
            tracing::debug!(action, "undeclared row action ignored");
            return None;
        }
        Some(ExplorerEvent::Action {
            action: action.to_string(),
            record: record.clone(),
        })
    }

    // --- detail panel ---

    pub fn open_detail(&mut self, id: &str) -> Result<()> {
        let record = self
            .input
            .data
            .iter()
            .find(|r| record_id(r).as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| VitrineError::RecordNotFound(id.to_string()))?;
        Ok(self.replace_panel(record)?)
    }

    fn replace_panel(&mut self, record: Value) -> std::result::Result<(), PanelError> {
        if self.panel.as_ref().is_some_and(DetailPanel::is_saving) {
            return Err(PanelError::SaveInFlight);
        }
        self.panel = Some(DetailPanel::open(self.config.detail_schema(), record));
        Ok(())
    }

    /// Closes the panel, discarding any edits.
    pub fn close_detail(&mut self) -> Result<Option<ExplorerEvent>> {
        let Some(panel) = self.panel.as_mut() else {
            return Ok(None);
        };
        let was_editing = panel.is_editing();
        panel.cancel()?;
        self.panel = None;
        Ok(was_editing.then_some(ExplorerEvent::ToggleEdit(false)))
    }

    pub fn select_tab(&mut self, id: &str) -> Result<bool> {
        Ok(self.open_panel()?.select_tab(id))
    }

    pub fn toggle_edit(&mut self) -> Result<ExplorerEvent> {
        let editing = self.open_panel()?.toggle_edit()?;
        Ok(ExplorerEvent::ToggleEdit(editing))
    }

    pub fn edit_field(&mut self, key: &str, value: Value) -> Result<()> {
        Ok(self.open_panel()?.set_field(key, value)?)
    }

    pub fn edit_input(&mut self, key: &str, raw: &str) -> Result<()> {
        Ok(self.open_panel()?.set_input(key, raw)?)
    }

    pub fn cancel_edit(&mut self) -> Result<Option<ExplorerEvent>> {
        let panel = self.open_panel()?;
        let was_editing = panel.is_editing();
        panel.cancel()?;
        Ok(was_editing.then_some(ExplorerEvent::ToggleEdit(false)))
    }

    /// Starts a save and hands out the buffer for the host to persist.
    ///
    /// Until [`finish_save_detail`](Self::finish_save_detail) or
    /// [`abort_save_detail`](Self::abort_save_detail) is called the panel
    /// renders as loading; the rest of the explorer stays usable.
    pub fn begin_save_detail(&mut self) -> Result<Value> {
        Ok(self.open_panel()?.begin_save()?)
    }

    /// Settles a save started with [`begin_save_detail`](Self::begin_save_detail).
    pub fn finish_save_detail<E: fmt::Display>(
        &mut self,
        outcome: std::result::Result<(), E>,
    ) -> Result<ExplorerEvent> {
        self.open_panel()?.finish_save(outcome)?;
        Ok(ExplorerEvent::ToggleEdit(false))
    }

    /// Gives up on a started save. The panel goes back to editing.
    pub fn abort_save_detail(&mut self) -> Result<()> {
        Ok(self.open_panel()?.abort_save()?)
    }

    /// Saves the panel's buffer through the host's `on_save`.
    ///
    /// Holds the explorer for the whole await. Hosts that keep rendering while
    /// the save runs use `begin_save_detail` and `finish_save_detail` instead.
    /// Dropping the future before it completes aborts the save.
    pub async fn save_detail<F, Fut, E>(&mut self, on_save: F) -> Result<ExplorerEvent>
    where
        F: FnOnce(Value) -> Fut,
        Fut: Future<Output = std::result::Result<(), E>>,
        E: fmt::Display,
    {
        self.open_panel()?.save(on_save).await?;
        Ok(ExplorerEvent::ToggleEdit(false))
    }

    fn open_panel(&mut self) -> std::result::Result<&mut DetailPanel, PanelError> {
        self.panel.as_mut().ok_or(PanelError::Closed)
    }

    // --- view ---

    pub fn render(&self) -> ExplorerView {
        let layout = self.layout();
        let data = &self.input.data;

        let (table, cards): (Option<TableView>, Option<Vec<CardView>>) = match layout.presentation {
            Presentation::Table => (Some(self.table()), None),
            Presentation::Cards => (
                None,
                Some(
                    data.iter()
                        .map(|r| self.mobile.project(r, &self.config.columns, &self.registry))
                        .collect(),
                ),
            ),
        };

        let empty = (data.is_empty() && !self.input.is_loading)
            .then(|| format!("No {} found", self.config.plural()));

        let detail = self.panel.as_ref().map(|panel| DetailView {
            width: layout.drawer,
            panel: match &self.config.custom_detail {
                Some(custom) => custom.render(panel, &self.registry),
                None => panel.view(&self.registry),
            },
        });

        ExplorerView {
            entity_name: self.config.entity_name.clone(),
            layout,
            loading: self.input.is_loading,
            table,
            cards,
            empty,
            filters: self.config.filters.bar(
                &self.input.filters,
                layout.filter_surface,
                self.filters_open(),
            ),
            pagination: self.pagination.view(&self.input.pagination),
            detail,
        }
    }

    fn table(&self) -> TableView {
        let headers = self
            .config
            .columns
            .iter()
            .map(|c| ColumnHeader {
                key: c.key.clone(),
                label: c.display_label().to_string(),
                field_type: c.field_type.tag().to_string(),
                min_width: c.min_width,
            })
            .collect();
        let rows = self
            .input
            .data
            .iter()
            .map(|record| RowView {
                id: record_id(record),
                cells: self
                    .config
                    .columns
                    .iter()
                    .map(|c| self.registry.render(record, c))
                    .collect(),
            })
            .collect();
        TableView { headers, rows }
    }
}

fn page_event(request: PageRequest) -> ExplorerEvent {
    match request {
        PageRequest::Page(page) => {
            tracing::debug!(page, "page change");
            ExplorerEvent::PageChange(page)
        }
        PageRequest::PageSize(limit) => {
            tracing::debug!(limit, "page size change");
            ExplorerEvent::PageSizeChange(limit)
        }
    }
}

fn apply_width(viewport: &mut Viewport, breakpoints: Breakpoints, width: u32) {
    let breakpoint = breakpoints.classify(width);
    if breakpoint != viewport.breakpoint {
        tracing::debug!(width, from = ?viewport.breakpoint, to = ?breakpoint, "breakpoint change");
    }
    viewport.width = width;
    viewport.breakpoint = breakpoint;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnHeader {
    pub key: String,
    pub label: String,
    pub field_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub headers: Vec<ColumnHeader>,
    pub rows: Vec<RowView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub width: DrawerWidth,
    pub panel: PanelView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplorerView {
    pub entity_name: String,
    pub layout: LayoutPlan,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TableView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<CardView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty: Option<String>,
    pub filters: FilterBarView,
    pub pagination: PaginationView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<DetailView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::OptionItem;
    use crate::source::fixtures::{product_filters, product_source};
    use crate::source::{DataSource, Query};
    use futures::executor::block_on;
    use serde_json::json;

    fn config() -> ExplorerConfig {
        ExplorerConfig::new(
            "Product",
            vec![
                FieldDescriptor::text("name", "Name"),
                FieldDescriptor::new("price", FieldType::Currency, "Price"),
                FieldDescriptor::new("status", FieldType::Badge, "Status").options(vec![
                    OptionItem::new("active", "Active").color("green"),
                    OptionItem::new("draft", "Draft").color("yellow"),
                ]),
                FieldDescriptor::new("actions", FieldType::Action, "Actions").options(vec![
                    OptionItem::new("view", "View"),
                    OptionItem::new("delete", "Delete").color("red"),
                ]),
            ],
        )
        .filters(product_filters())
    }

    fn explorer_with_page(page: u32) -> Explorer {
        let mut explorer = Explorer::new(config(), &Settings::default());
        let filters = explorer.input().filters.clone();
        let result = product_source(25)
            .fetch(&Query::new(filters.clone(), page, 10))
            .unwrap();
        explorer.set_input(ExplorerInput {
            data: result.records,
            pagination: result.pagination,
            filters,
            ..Default::default()
        });
        explorer
    }

    #[test]
    fn desktop_renders_table() {
        let view = explorer_with_page(1).render();
        assert_eq!(view.layout.presentation, Presentation::Table);
        let table = view.table.unwrap();
        assert_eq!(table.headers.len(), 4);
        assert_eq!(table.rows.len(), 10);
        assert!(view.cards.is_none());
        assert_eq!(view.pagination.range, "Showing 1 to 10 of 25");
    }

    #[test]
    fn mobile_renders_cards() {
        let mut explorer = explorer_with_page(1);
        explorer.set_viewport_width(400);
        let view = explorer.render();
        assert_eq!(view.layout.drawer, DrawerWidth::Full);
        assert_eq!(view.filters.surface, FilterSurface::BottomSheet);
        assert_eq!(view.cards.unwrap().len(), 10);
        assert!(view.table.is_none());
    }

    #[test]
    fn empty_message_uses_plural() {
        let explorer = Explorer::new(config(), &Settings::default());
        assert_eq!(explorer.render().empty.as_deref(), Some("No products found"));
    }

    #[test]
    fn resize_events_reclassify_while_mounted() {
        let hub = EventHub::new();
        let mut explorer = explorer_with_page(1);
        explorer.mount(&hub);
        assert!(explorer.is_mounted());
        assert_eq!(hub.listener_count(), 2);

        hub.emit(&UiEvent::Resize { width: 800 });
        assert_eq!(explorer.layout().breakpoint, Breakpoint::Tablet);

        explorer.unmount();
        assert_eq!(hub.listener_count(), 0);
        hub.emit(&UiEvent::Resize { width: 300 });
        assert_eq!(explorer.layout().breakpoint, Breakpoint::Tablet);
    }

    #[test]
    fn dropping_explorer_releases_listeners() {
        let hub = EventHub::new();
        {
            let mut explorer = explorer_with_page(1);
            explorer.mount(&hub);
        }
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn click_outside_closes_filters() {
        let hub = EventHub::new();
        let mut explorer = explorer_with_page(1);
        explorer.mount(&hub);

        assert!(explorer.toggle_filters());
        hub.emit(&UiEvent::PointerDown { region: Region::FilterSurface });
        assert!(explorer.filters_open());
        hub.emit(&UiEvent::PointerDown { region: Region::Content });
        assert!(!explorer.filters_open());
    }

    #[test]
    fn clear_filters_collapses_mobile_sheet() {
        let mut explorer = explorer_with_page(1);
        explorer.set_viewport_width(375);
        explorer.toggle_filters();

        let event = explorer.clear_filters();
        assert!(!explorer.filters_open());
        assert_eq!(
            event,
            ExplorerEvent::ClearFilters {
                reset: product_filters().clear_all()
            }
        );
    }

    #[test]
    fn chip_removal_emits_single_field_delta() {
        let mut explorer = explorer_with_page(1);
        let mut input = explorer.input().clone();
        input.filters.set("search", "shoe");
        input.filters.set("status", "draft");
        explorer.set_input(input);

        assert_eq!(
            explorer.remove_chip("search"),
            Some(ExplorerEvent::FilterChange(FilterDelta::single("search", "")))
        );
        assert_eq!(explorer.remove_chip("sortBy"), None);
    }

    #[test]
    fn change_filter_emits_delta() {
        let mut explorer = explorer_with_page(1);
        assert_eq!(
            explorer.change_filter("status", "active"),
            ExplorerEvent::FilterChange(FilterDelta::single("status", "active"))
        );
    }

    #[test]
    fn page_navigation_events() {
        let explorer = explorer_with_page(2);
        assert_eq!(explorer.next_page(), Some(ExplorerEvent::PageChange(3)));
        assert_eq!(explorer.prev_page(), Some(ExplorerEvent::PageChange(1)));
        assert_eq!(explorer.go_to_page(2), None);
        assert_eq!(explorer.change_page_size(20), Some(ExplorerEvent::PageSizeChange(20)));
    }

    #[test]
    fn row_click_opens_panel_and_actions_do_not() {
        let mut explorer = explorer_with_page(1);

        let action = explorer.trigger_action(0, "delete").unwrap();
        assert!(matches!(action, ExplorerEvent::Action { ref action, .. } if action == "delete"));
        assert!(explorer.panel().is_none());
        assert_eq!(explorer.trigger_action(0, "explode"), None);

        let click = explorer.click_row(1).unwrap();
        assert!(matches!(click, ExplorerEvent::RowClick(ref r) if r["id"] == json!(2)));
        assert_eq!(explorer.panel().unwrap().record_id().as_deref(), Some("2"));
        assert!(explorer.render().detail.is_some());
    }

    #[test]
    fn edit_and_save_through_explorer() {
        let mut source = product_source(25);
        let mut explorer = explorer_with_page(1);
        explorer.open_detail("3").unwrap();

        assert_eq!(explorer.toggle_edit().unwrap(), ExplorerEvent::ToggleEdit(true));
        explorer.edit_input("price", "12.5").unwrap();

        let event = block_on(explorer.save_detail(|data| {
            let outcome = source.update("3", data).map(|_| ());
            async move { outcome }
        }))
        .unwrap();
        assert_eq!(event, ExplorerEvent::ToggleEdit(false));
        assert_eq!(source.get("3").unwrap()["price"], json!(12.5));
        assert!(!explorer.panel().unwrap().is_editing());
    }

    #[test]
    fn split_save_keeps_explorer_interactive() {
        let mut source = product_source(25);
        let mut explorer = explorer_with_page(2);
        explorer.open_detail("12").unwrap();
        explorer.toggle_edit().unwrap();
        explorer.edit_input("name", "Renamed").unwrap();

        let buffer = explorer.begin_save_detail().unwrap();
        assert_eq!(buffer["name"], json!("Renamed"));
        assert!(explorer.render().detail.unwrap().panel.loading);
        assert_eq!(explorer.next_page(), Some(ExplorerEvent::PageChange(3)));
        assert!(matches!(
            explorer.change_filter("search", "shoe"),
            ExplorerEvent::FilterChange(_)
        ));
        assert!(matches!(
            explorer.begin_save_detail(),
            Err(VitrineError::Panel(PanelError::SaveInFlight))
        ));

        let outcome = source.update("12", buffer).map(|_| ());
        assert_eq!(
            explorer.finish_save_detail(outcome).unwrap(),
            ExplorerEvent::ToggleEdit(false)
        );
        let view = explorer.render().detail.unwrap().panel;
        assert!(!view.loading);
        assert_eq!(source.get("12").unwrap()["name"], json!("Renamed"));
    }

    #[test]
    fn dropped_save_future_does_not_jam_panel() {
        use futures::future::{self, FutureExt};

        let mut explorer = explorer_with_page(1);
        explorer.open_detail("1").unwrap();
        explorer.toggle_edit().unwrap();

        let pending = explorer.save_detail(|_| future::pending::<std::result::Result<(), String>>());
        assert!(pending.now_or_never().is_none());

        assert!(explorer.panel().unwrap().is_editing());
        assert_eq!(
            explorer.cancel_edit().unwrap(),
            Some(ExplorerEvent::ToggleEdit(false))
        );
        explorer.open_detail("2").unwrap();
        assert_eq!(explorer.panel().unwrap().record_id().as_deref(), Some("2"));
    }

    #[test]
    fn aborted_save_returns_to_editing() {
        let mut explorer = explorer_with_page(1);
        explorer.open_detail("1").unwrap();
        explorer.toggle_edit().unwrap();
        explorer.begin_save_detail().unwrap();

        explorer.abort_save_detail().unwrap();
        assert!(explorer.panel().unwrap().is_editing());
        assert!(explorer.close_detail().unwrap().is_some());
    }

    #[test]
    fn row_click_during_save_keeps_saving_record() {
        let mut explorer = explorer_with_page(1);
        explorer.open_detail("1").unwrap();
        explorer.toggle_edit().unwrap();
        explorer.begin_save_detail().unwrap();

        let click = explorer.click_row(1).unwrap();
        assert!(matches!(click, ExplorerEvent::RowClick(ref r) if r["id"] == json!(2)));
        let panel = explorer.panel().unwrap();
        assert_eq!(panel.record_id().as_deref(), Some("1"));
        assert!(panel.is_saving());
        assert!(matches!(
            explorer.open_detail("2"),
            Err(VitrineError::Panel(PanelError::SaveInFlight))
        ));
    }

    #[test]
    fn host_editing_flag_drives_panel() {
        let mut explorer = explorer_with_page(1);
        explorer.open_detail("1").unwrap();

        let mut input = explorer.input().clone();
        input.is_editing = Some(true);
        explorer.set_input(input.clone());
        assert!(explorer.panel().unwrap().is_editing());

        input.is_editing = Some(false);
        explorer.set_input(input);
        assert!(!explorer.panel().unwrap().is_editing());
    }

    #[test]
    fn close_detail_cancels_edits() {
        let mut explorer = explorer_with_page(1);
        explorer.open_detail("1").unwrap();
        explorer.toggle_edit().unwrap();
        assert_eq!(
            explorer.close_detail().unwrap(),
            Some(ExplorerEvent::ToggleEdit(false))
        );
        assert!(explorer.panel().is_none());
        assert_eq!(explorer.close_detail().unwrap(), None);
    }

    #[test]
    fn panel_operations_need_an_open_record() {
        let mut explorer = explorer_with_page(1);
        assert!(matches!(
            explorer.toggle_edit(),
            Err(VitrineError::Panel(PanelError::Closed))
        ));
        assert!(matches!(
            explorer.open_detail("999"),
            Err(VitrineError::RecordNotFound(_))
        ));
    }

    #[test]
    fn custom_detail_renderer_replaces_view() {
        let config = config().custom_detail(|panel: &DetailPanel, registry: &RendererRegistry| {
            let mut view = panel.view(registry);
            view.title = "Custom".to_string();
            view
        });
        let mut explorer = Explorer::new(config, &Settings::default());
        explorer.set_input(ExplorerInput {
            data: vec![json!({ "id": 1, "name": "One" })],
            ..Default::default()
        });
        explorer.click_row(0);
        assert_eq!(explorer.render().detail.unwrap().panel.title, "Custom");
    }

    #[test]
    fn strict_rejects_bad_config() {
        let bad = ExplorerConfig::new("", vec![FieldDescriptor::new("x", FieldType::Badge, "X")]);
        let err = Explorer::strict(bad.clone(), &Settings::default()).err().unwrap();
        assert!(err.to_string().contains("entityName"));

        // lenient construction still renders
        let explorer = Explorer::new(bad, &Settings::default());
        assert!(explorer.render().table.is_some());
    }

    #[test]
    fn config_from_json() {
        let config = ExplorerConfig::from_json(
            r#"{
                "entityName": "Order",
                "columns": [
                    { "key": "id", "type": "text", "label": "Order" },
                    { "key": "total", "type": "currency", "label": "Total" }
                ],
                "filters": { "fields": [{ "key": "search", "type": "search", "label": "Search" }] },
                "mobile": { "title": "id", "details": ["total"] }
            }"#,
        )
        .unwrap();
        assert_eq!(config.plural(), "orders");
        assert!(config.violations().is_empty());
        assert_eq!(config.mobile_layout().details, vec!["total".to_string()]);
    }
}
