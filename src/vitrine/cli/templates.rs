//! # CLI Templates
//!
//! Terminal output goes through minijinja templates rendered by `vitrine-theme`.
//! Templates live in their own `.tmp` files so they are easy to edit and diff,
//! and are pulled in here as string constants.
//!
//! A few conventions keep them readable:
//!
//! 1. Line breaks are explicit. Every tag trims surrounding template
//!    whitespace (`{%- ... -%}`) and newlines are written as `{{ "\n" }}`, so
//!    the output layout never depends on how the template source is indented.
//! 2. One template per view part. The list screen is assembled in Rust from
//!    the chips, table (or cards) and pagination templates.
//! 3. Layout math stays in Rust. Column widths, truncation and which style a
//!    page number gets are computed in `render.rs`; templates only pick up
//!    the result. The one conditional they carry is whether a cell has a tone.

pub const CHIPS: &str = "chips";
pub const TABLE: &str = "table";
pub const CARDS: &str = "cards";
pub const PAGINATION: &str = "pagination";
pub const DETAIL: &str = "detail";
pub const TEXT_LIST: &str = "text_list";
pub const MESSAGES: &str = "messages";

/// Every template by name, registered once per renderer.
pub const TEMPLATES: [(&str, &str); 7] = [
    (CHIPS, include_str!("templates/chips.tmp")),
    (TABLE, include_str!("templates/table.tmp")),
    (CARDS, include_str!("templates/cards.tmp")),
    (PAGINATION, include_str!("templates/pagination.tmp")),
    (DETAIL, include_str!("templates/detail.tmp")),
    (TEXT_LIST, include_str!("templates/text_list.tmp")),
    (MESSAGES, include_str!("templates/messages.tmp")),
];
