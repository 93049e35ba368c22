//! # Responsive Layout
//!
//! The viewport width picks one of three breakpoints, and the breakpoint picks
//! everything else:
//!
//! | Breakpoint | Width (defaults) | Records | Filter bar | Detail drawer |
//! |------------|------------------|---------|------------|---------------|
//! | mobile | `< 768` | cards | bottom sheet | full width |
//! | tablet | `768..1024` | cards | inline panel | fixed max width |
//! | desktop | `>= 1024` | table | inline panel | fixed max width |
//!
//! Cards show a constrained subset of a record described by [`MobileLayout`].
//!
//! ## Listeners
//!
//! Resize and click-outside notifications arrive through an [`EventHub`].
//! Subscribing returns a [`Subscription`] guard; dropping the guard removes
//! the listener, including while the hub is in the middle of an emit. There
//! are no global listeners.

use crate::descriptor::{FieldDescriptor, FieldType};
use crate::error::ConfigViolation;
use crate::record::{display, lookup, record_id};
use crate::render::{Cell, RendererRegistry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::{Cell as IdCell, RefCell, RefMut};
use std::collections::HashSet;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

/// Width thresholds. `mobile_max` is the first non-mobile width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoints {
    pub mobile_max: u32,
    pub desktop_min: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::new(768, 1024)
    }
}

impl Breakpoints {
    pub fn new(mobile_max: u32, desktop_min: u32) -> Self {
        Self {
            mobile_max,
            desktop_min,
        }
    }

    pub fn classify(&self, width: u32) -> Breakpoint {
        if width < self.mobile_max {
            Breakpoint::Mobile
        } else if width < self.desktop_min {
            Breakpoint::Tablet
        } else {
            Breakpoint::Desktop
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presentation {
    Table,
    Cards,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterSurface {
    BottomSheet,
    InlinePanel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawerWidth {
    Full,
    Fixed(u32),
}

/// Everything the breakpoint decides, in one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutPlan {
    pub breakpoint: Breakpoint,
    pub presentation: Presentation,
    pub filter_surface: FilterSurface,
    pub drawer: DrawerWidth,
}

impl LayoutPlan {
    pub fn for_breakpoint(breakpoint: Breakpoint, drawer_max_width: u32) -> Self {
        match breakpoint {
            Breakpoint::Mobile => Self {
                breakpoint,
                presentation: Presentation::Cards,
                filter_surface: FilterSurface::BottomSheet,
                drawer: DrawerWidth::Full,
            },
            Breakpoint::Tablet => Self {
                breakpoint,
                presentation: Presentation::Cards,
                filter_surface: FilterSurface::InlinePanel,
                drawer: DrawerWidth::Fixed(drawer_max_width),
            },
            Breakpoint::Desktop => Self {
                breakpoint,
                presentation: Presentation::Table,
                filter_surface: FilterSurface::InlinePanel,
                drawer: DrawerWidth::Fixed(drawer_max_width),
            },
        }
    }
}

/// Which record keys appear where on a mobile/tablet card.
///
/// Keys are looked up among the explorer's columns so a card cell renders
/// exactly like the table cell; keys without a column render as plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobileLayout {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardDetail {
    pub label: String,
    pub cell: Cell,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: Cell,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<Cell>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Cell>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Cell>,
    pub details: Vec<CardDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<Cell>,
}

const DERIVED_DETAIL_COUNT: usize = 3;

impl MobileLayout {
    /// A layout built from the column order when none is configured: first
    /// text column as title, the first image as avatar, the first badge or
    /// status as status, actions in the footer, a few remaining columns as details.
    pub fn derive(columns: &[FieldDescriptor]) -> Self {
        let first_key = |pred: fn(&FieldType) -> bool| {
            columns
                .iter()
                .find(|c| pred(&c.field_type))
                .map(|c| c.key.clone())
        };

        let title = first_key(|t| *t == FieldType::Text)
            .or_else(|| columns.first().map(|c| c.key.clone()))
            .unwrap_or_else(|| "id".to_string());
        let avatar = first_key(|t| *t == FieldType::Image);
        let status = first_key(|t| matches!(t, FieldType::Badge | FieldType::Status));
        let footer = first_key(|t| *t == FieldType::Action);

        let taken: Vec<&str> = [Some(&title), avatar.as_ref(), status.as_ref(), footer.as_ref()]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();
        let details = columns
            .iter()
            .filter(|c| !taken.contains(&c.key.as_str()))
            .take(DERIVED_DETAIL_COUNT)
            .map(|c| c.key.clone())
            .collect();

        Self {
            title,
            subtitle: None,
            avatar,
            status,
            details,
            footer,
        }
    }

    pub fn project(
        &self,
        record: &Value,
        columns: &[FieldDescriptor],
        registry: &RendererRegistry,
    ) -> CardView {
        let cell = |key: &str| -> Cell {
            match columns.iter().find(|c| c.key == key) {
                Some(column) => registry.render(record, column),
                None => match lookup(record, key) {
                    Value::Null => Cell::Empty,
                    value => Cell::text(display(value)),
                },
            }
        };
        let optional = |key: &Option<String>| key.as_deref().map(cell);

        let details = self
            .details
            .iter()
            .map(|key| CardDetail {
                label: columns
                    .iter()
                    .find(|c| &c.key == key)
                    .map(|c| c.display_label().to_string())
                    .unwrap_or_else(|| key.clone()),
                cell: cell(key),
            })
            .collect();

        CardView {
            id: record_id(record),
            title: cell(&self.title),
            subtitle: optional(&self.subtitle),
            avatar: optional(&self.avatar),
            status: optional(&self.status),
            details,
            footer: optional(&self.footer),
        }
    }

    pub fn violations(&self, location: &str) -> Vec<ConfigViolation> {
        let mut found = Vec::new();
        if self.title.is_empty() {
            found.push(ConfigViolation::new(location, "mobile layout has no title key"));
        }
        found
    }
}

/// Regions a pointer event can land in. Anything outside an open surface dismisses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    FilterSurface,
    Drawer,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Resize { width: u32 },
    PointerDown { region: Region },
}

type Listener = Rc<RefCell<Box<dyn FnMut(&UiEvent)>>>;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
    removed: HashSet<u64>,
}

impl HubInner {
    fn release(&mut self, id: u64) {
        self.listeners.retain(|(listener, _)| *listener != id);
        self.removed.insert(id);
    }
}

#[derive(Default)]
struct HubShared {
    inner: RefCell<HubInner>,
    /// Ids released while `inner` was borrowed, applied on its next borrow.
    tombstones: IdCell<Vec<u64>>,
}

impl HubShared {
    fn inner_mut(&self) -> RefMut<'_, HubInner> {
        let mut inner = self.inner.borrow_mut();
        for id in self.tombstones.take() {
            inner.release(id);
        }
        inner
    }

    fn release(&self, id: u64) {
        match self.inner.try_borrow_mut() {
            Ok(mut inner) => inner.release(id),
            Err(_) => {
                tracing::debug!(id, "hub busy, listener release deferred");
                let mut ids = self.tombstones.take();
                ids.push(id);
                self.tombstones.set(ids);
            }
        }
    }
}

/// Dispatches viewport events to scoped listeners.
#[derive(Clone, Default)]
pub struct EventHub {
    shared: Rc<HubShared>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl FnMut(&UiEvent) + 'static) -> Subscription {
        let mut inner = self.shared.inner_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner
            .listeners
            .push((id, Rc::new(RefCell::new(Box::new(listener)))));
        Subscription {
            id,
            hub: Rc::downgrade(&self.shared),
        }
    }

    /// Delivers an event to every live listener, returning how many ran.
    ///
    /// A listener released by an earlier listener in the same emit is skipped.
    /// A listener that re-enters `emit` is not called recursively.
    pub fn emit(&self, event: &UiEvent) -> usize {
        let snapshot: Vec<(u64, Listener)> = self.shared.inner_mut().listeners.clone();
        let mut delivered = 0;
        for (id, listener) in snapshot {
            if self.shared.inner_mut().removed.contains(&id) {
                continue;
            }
            if let Ok(mut callback) = listener.try_borrow_mut() {
                (*callback)(event);
                delivered += 1;
            }
        }
        self.shared.inner_mut().removed.clear();
        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.shared.inner_mut().listeners.len()
    }
}

/// Guard for one listener. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    hub: Weak<HubShared>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.release(self.id);
        }
    }
}
