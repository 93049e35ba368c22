//! # Vitrine Architecture
//!
//! Vitrine is a **headless, schema-driven data-presentation engine**. A small
//! declarative config describes the columns, filters, card layout and detail
//! tabs of a list screen; the engine interprets it and produces plain,
//! serializable view models. It never draws anything itself: a web frontend,
//! a TUI or the bundled terminal binary turns those view models into output.
//!
//! ## Components
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Explorer (explorer.rs)                                     │
//! │  - one instance per list screen, owns no cross-screen state │
//! │  - interactions return ExplorerEvents for the host          │
//! └─────────────────────────────────────────────────────────────┘
//!        │            │            │             │
//!        ▼            ▼            ▼             ▼
//!  ┌──────────┐ ┌──────────┐ ┌────────────┐ ┌──────────────┐
//!  │ render   │ │ layout   │ │ filters    │ │ pagination   │
//!  │ Cell per │ │ viewport │ │ active     │ │ page window, │
//!  │ field    │ │ → plan   │ │ chips      │ │ range label  │
//!  └──────────┘ └──────────┘ └────────────┘ └──────────────┘
//!        ▲
//!  ┌─────┴──────────────────────────────────────────────────────┐
//!  │  panel (panel.rs): tabbed detail view + edit state machine │
//!  └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Host Contract
//!
//! Records, pagination and filter values belong to the host screen. The
//! engine reads them as [`explorer::ExplorerInput`] and answers interactions
//! with [`explorer::ExplorerEvent`]s (page change, filter delta, row click,
//! row action, edit toggle). The host applies the event, usually by asking
//! its [`source::DataSource`] for a new page, and supplies fresh input.
//! Saving is the one async step: the host passes a closure returning a future.
//!
//! ## Failure Model
//!
//! - Rendering never fails. Unknown types, unmatched options, broken images
//!   and unparseable dates degrade to a fallback cell.
//! - Panel transitions that are not allowed return a [`error::PanelError`].
//! - Authored config is validated up front, see [`explorer::Explorer::strict`].
//!
//! ## Module Overview
//!
//! - [`descriptor`]: field descriptors, option lists, behavior hooks
//! - [`record`]: key-path lookup and assignment on JSON records
//! - [`render`]: the type-dispatched field renderer
//! - [`layout`]: breakpoints, card projection, scoped listeners
//! - [`filters`]: filter schema and active-filter projection
//! - [`pagination`]: page window and range label
//! - [`panel`]: detail/edit panel
//! - [`explorer`]: composition root
//! - [`source`]: data source trait and in-memory implementation
//! - [`settings`]: `config.json` settings

pub mod descriptor;
pub mod error;
pub mod explorer;
pub mod filters;
pub mod layout;
pub mod pagination;
pub mod panel;
pub mod record;
pub mod render;
pub mod settings;
pub mod source;

pub use vitrine_theme::Tone;
