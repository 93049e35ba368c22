//! # Rendering
//!
//! Turns engine view models into styled terminal text.
//!
//! Layout calculations (column widths, truncation, which style a page number
//! gets) stay in Rust because they need Unicode-aware width handling. The
//! template data structs below carry finished strings plus a tone or style
//! name, and the templates only arrange and color them.
//!
//! Every `render_*` function takes `use_color: Option<bool>`. `None` lets the
//! theme crate detect the terminal; `Some(false)` is what `--no-color` and
//! the tests use.

use super::styles::{names, VITRINE_THEME};
use super::templates::{self, TEMPLATES};
use once_cell::sync::OnceCell;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;
use vitrine::explorer::{ExplorerView, TableView};
use vitrine::filters::FilterBarView;
use vitrine::layout::CardView;
use vitrine::pagination::{PageItem, PaginationView};
use vitrine::panel::{EditorControl, FieldContent, PanelView};
use vitrine::record::display;
use vitrine::render::Cell;
use vitrine_theme::{fit_width, Renderer, ThemeChoice};

/// Widest a table column gets, in terminal columns.
pub const MAX_COLUMN_WIDTH: usize = 32;
/// Pixel widths from the schema (`minWidth`) are converted at this rate.
pub const PX_PER_COLUMN: u32 = 8;
pub const COLUMN_GAP: &str = "  ";
pub const STATUS_DOT: &str = "●";

#[derive(Serialize)]
struct CellData {
    text: String,
    /// Tone name, empty for uncolored cells.
    tone: String,
}

#[derive(Serialize)]
struct ChipsData {
    chips: Vec<CellData>,
}

#[derive(Serialize)]
struct TableData {
    headers: Vec<String>,
    rule: String,
    rows: Vec<Vec<CellData>>,
    gap: &'static str,
}

#[derive(Serialize)]
struct CardDetailData {
    label: String,
    value: CellData,
}

#[derive(Serialize)]
struct CardData {
    title: String,
    subtitle: Option<String>,
    status: Option<CellData>,
    details: Vec<CardDetailData>,
    footer: Option<String>,
}

#[derive(Serialize)]
struct CardsData {
    cards: Vec<CardData>,
    label_width: usize,
}

#[derive(Serialize)]
struct PageData {
    label: String,
    style: &'static str,
}

#[derive(Serialize)]
struct PaginationData {
    range: String,
    pages: Vec<PageData>,
    prev: PageData,
    next: PageData,
    size: String,
}

#[derive(Serialize)]
struct TabData {
    label: String,
    style: &'static str,
}

#[derive(Serialize)]
struct FieldData {
    label: String,
    value: String,
    tone: String,
    style: &'static str,
}

#[derive(Serialize)]
struct SectionData {
    title: Option<String>,
    fields: Vec<FieldData>,
}

#[derive(Serialize)]
struct DetailData {
    title: String,
    id: Option<String>,
    mode: String,
    tabs: Vec<TabData>,
    sections: Vec<SectionData>,
    label_width: usize,
    footer: Option<String>,
}

#[derive(Serialize)]
struct TextListData {
    lines: Vec<String>,
    empty_message: String,
}

#[derive(Serialize)]
struct MessageData {
    content: String,
    style: String,
}

#[derive(Serialize)]
struct MessagesData {
    messages: Vec<MessageData>,
}

/// Severity of a one-line status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// The renderer for a color mode, with every template compiled on first use.
fn renderer(use_color: Option<bool>) -> &'static Renderer {
    static DETECTED: OnceCell<Renderer> = OnceCell::new();
    static COLOR: OnceCell<Renderer> = OnceCell::new();
    static PLAIN: OnceCell<Renderer> = OnceCell::new();

    let cell = match use_color {
        None => &DETECTED,
        Some(true) => &COLOR,
        Some(false) => &PLAIN,
    };
    cell.get_or_init(|| {
        let theme = ThemeChoice::from(&*VITRINE_THEME);
        let mut renderer = match use_color {
            Some(c) => Renderer::with_color(theme, c),
            None => Renderer::new(theme),
        };
        for (name, source) in TEMPLATES {
            if let Err(e) = renderer.add_template(name, source) {
                tracing::warn!(template = name, error = %e, "template failed to compile");
            }
        }
        renderer
    })
}

fn render_template<T: Serialize>(
    name: &str,
    data: &T,
    use_color: Option<bool>,
    fallback: impl FnOnce() -> String,
) -> String {
    renderer(use_color).render(name, data).unwrap_or_else(|e| {
        tracing::warn!(template = name, error = %e, "template render failed");
        fallback()
    })
}

/// Text a cell shows in the terminal. Status cells get a leading dot.
fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Status { label, .. } => format!("{} {}", STATUS_DOT, label),
        other => other.plain_text(),
    }
}

fn cell_tone(cell: &Cell) -> String {
    match cell {
        Cell::Badge {
            tone, text_tone, ..
        } => text_tone.unwrap_or(*tone).name().to_string(),
        Cell::Status { dot, .. } => dot.name().to_string(),
        _ => String::new(),
    }
}

fn cell_data(cell: &Cell) -> CellData {
    CellData {
        text: cell_text(cell),
        tone: cell_tone(cell),
    }
}

// --- list screen ---

/// Renders a whole list screen: chips, records, pagination, and the detail
/// panel when one is open.
pub fn render_explorer(view: &ExplorerView, use_color: Option<bool>) -> String {
    let mut out = String::new();

    out.push_str(&render_chips(&view.filters, use_color));
    if !out.is_empty() {
        out.push('\n');
    }

    if let Some(message) = &view.empty {
        out.push_str(&render_text_list(&[], message, use_color));
    } else if let Some(table) = &view.table {
        out.push_str(&render_table(table, use_color));
    } else if let Some(cards) = &view.cards {
        out.push_str(&render_cards(cards, use_color));
    }

    out.push('\n');
    out.push_str(&render_pagination(&view.pagination, use_color));

    if let Some(detail) = &view.detail {
        out.push('\n');
        out.push_str(&render_panel(&detail.panel, None, use_color));
    }
    out
}

fn render_chips(bar: &FilterBarView, use_color: Option<bool>) -> String {
    if bar.chips.is_empty() {
        return String::new();
    }
    let data = ChipsData {
        chips: bar
            .chips
            .iter()
            .map(|chip| CellData {
                text: format!("{} ×", chip.label),
                tone: chip.tone.name().to_string(),
            })
            .collect(),
    };
    render_template(templates::CHIPS, &data, use_color, || {
        let labels: Vec<&str> = bar.chips.iter().map(|c| c.label.as_str()).collect();
        format!("{}\n", labels.join("  "))
    })
}

fn column_widths(table: &TableView) -> Vec<usize> {
    table
        .headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let floor = header.min_width.map_or(0, |px| (px / PX_PER_COLUMN) as usize);
            let content = table
                .rows
                .iter()
                .filter_map(|row| row.cells.get(i))
                .map(|cell| cell_text(cell).width())
                .max()
                .unwrap_or(0);
            header.label.width().max(content).max(floor).min(MAX_COLUMN_WIDTH)
        })
        .collect()
}

/// Fits every column to its width. The last column is not padded.
fn fit_row(texts: impl Iterator<Item = String>, widths: &[usize]) -> Vec<String> {
    texts
        .zip(widths)
        .enumerate()
        .map(|(i, (text, width))| {
            let fitted = fit_width(&text, *width);
            if i + 1 == widths.len() {
                fitted.trim_end().to_string()
            } else {
                fitted
            }
        })
        .collect()
}

fn render_table(table: &TableView, use_color: Option<bool>) -> String {
    let widths = column_widths(table);
    let total = widths.iter().sum::<usize>() + COLUMN_GAP.width() * widths.len().saturating_sub(1);

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let texts = fit_row(row.cells.iter().map(cell_text), &widths);
            texts
                .into_iter()
                .zip(&row.cells)
                .map(|(text, cell)| CellData {
                    text,
                    tone: cell_tone(cell),
                })
                .collect()
        })
        .collect();

    let data = TableData {
        headers: fit_row(table.headers.iter().map(|h| h.label.clone()), &widths),
        rule: "─".repeat(total),
        rows,
        gap: COLUMN_GAP,
    };

    render_template(templates::TABLE, &data, use_color, || {
        data.rows
            .iter()
            .map(|row| {
                let texts: Vec<&str> = row.iter().map(|c| c.text.as_str()).collect();
                format!("{}\n", texts.join(COLUMN_GAP))
            })
            .collect()
    })
}

fn render_cards(cards: &[CardView], use_color: Option<bool>) -> String {
    let label_width = cards
        .iter()
        .flat_map(|card| card.details.iter().map(|d| d.label.width()))
        .max()
        .unwrap_or(0);

    let data = CardsData {
        cards: cards
            .iter()
            .map(|card| CardData {
                title: card.title.plain_text(),
                subtitle: card
                    .subtitle
                    .as_ref()
                    .map(Cell::plain_text)
                    .filter(|s| !s.is_empty()),
                status: card.status.as_ref().filter(|c| !c.is_empty()).map(cell_data),
                details: card
                    .details
                    .iter()
                    .map(|detail| CardDetailData {
                        label: detail.label.clone(),
                        value: cell_data(&detail.cell),
                    })
                    .collect(),
                footer: card
                    .footer
                    .as_ref()
                    .map(Cell::plain_text)
                    .filter(|s| !s.is_empty()),
            })
            .collect(),
        label_width,
    };

    render_template(templates::CARDS, &data, use_color, || {
        data.cards
            .iter()
            .map(|card| format!("{}\n", card.title))
            .collect()
    })
}

fn nav(label: &str, enabled: bool) -> PageData {
    PageData {
        label: label.to_string(),
        style: if enabled { names::REGULAR } else { names::FAINT },
    }
}

fn render_pagination(view: &PaginationView, use_color: Option<bool>) -> String {
    let pages = if view.total_pages > 1 {
        view.window
            .iter()
            .map(|item| match item {
                PageItem::Page(n) if *n == view.current_page => PageData {
                    label: format!("[{}]", n),
                    style: names::PAGE_CURRENT,
                },
                PageItem::Page(n) => PageData {
                    label: n.to_string(),
                    style: names::REGULAR,
                },
                PageItem::Ellipsis => PageData {
                    label: "…".to_string(),
                    style: names::FAINT,
                },
            })
            .collect()
    } else {
        Vec::new()
    };

    let data = PaginationData {
        range: view.range.clone(),
        pages,
        prev: nav("‹", view.has_prev),
        next: nav("›", view.has_next),
        size: format!("{} per page", view.limit),
    };

    render_template(templates::PAGINATION, &data, use_color, || {
        format!("{}\n", view.range)
    })
}

// --- detail panel ---

fn editor_text(control: &EditorControl) -> String {
    let current = display(&control.value);
    let shown = match (&control.placeholder, current.is_empty()) {
        (Some(placeholder), true) => placeholder.clone(),
        _ => current,
    };
    if control.options.is_empty() {
        format!("[{}]", shown)
    } else {
        let choices: Vec<&str> = control.options.iter().map(|o| o.value.as_str()).collect();
        format!("[{}]  ({})", shown, choices.join("/"))
    }
}

fn field_data(label: &str, content: &FieldContent) -> FieldData {
    match content {
        FieldContent::Display { cell } => FieldData {
            label: label.to_string(),
            value: cell_text(cell),
            tone: cell_tone(cell),
            style: names::REGULAR,
        },
        FieldContent::Editor(control) => FieldData {
            label: label.to_string(),
            value: editor_text(control),
            tone: String::new(),
            style: if control.disabled {
                names::FAINT
            } else {
                names::REGULAR
            },
        },
    }
}

/// Renders the detail panel. `footer` is a hint line printed under it.
pub fn render_panel(
    panel: &PanelView,
    footer: Option<&str>,
    use_color: Option<bool>,
) -> String {
    let label_width = panel
        .sections
        .iter()
        .flat_map(|s| s.fields.iter().map(|f| f.label.width()))
        .max()
        .unwrap_or(0);

    let data = DetailData {
        title: panel.title.clone(),
        id: panel.record_id.as_ref().map(|id| format!("#{}", id)),
        mode: panel.mode.clone(),
        tabs: if panel.tabs.len() > 1 {
            panel
                .tabs
                .iter()
                .map(|tab| TabData {
                    label: tab.label.clone(),
                    style: if tab.active {
                        names::TAB_ACTIVE
                    } else {
                        names::MUTED
                    },
                })
                .collect()
        } else {
            Vec::new()
        },
        sections: panel
            .sections
            .iter()
            .map(|section| SectionData {
                title: section.title.clone(),
                fields: section
                    .fields
                    .iter()
                    .map(|f| field_data(&f.label, &f.content))
                    .collect(),
            })
            .collect(),
        label_width,
        footer: footer.map(str::to_string),
    };

    render_template(templates::DETAIL, &data, use_color, || {
        format!("{}\n", panel.title)
    })
}

// --- plain lines and messages ---

pub fn render_text_list(
    lines: &[String],
    empty_message: &str,
    use_color: Option<bool>,
) -> String {
    let data = TextListData {
        lines: lines.to_vec(),
        empty_message: empty_message.to_string(),
    };
    render_template(templates::TEXT_LIST, &data, use_color, || {
        format!("{}\n", empty_message)
    })
}

pub fn render_messages(
    messages: &[(MessageLevel, String)],
    use_color: Option<bool>,
) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let data = MessagesData {
        messages: messages
            .iter()
            .map(|(level, content)| MessageData {
                content: content.clone(),
                style: match level {
                    MessageLevel::Info => names::REGULAR,
                    MessageLevel::Success => names::SUCCESS,
                    MessageLevel::Warning => names::WARNING,
                    MessageLevel::Error => names::ERROR,
                }
                .to_string(),
            })
            .collect(),
    };
    render_template(templates::MESSAGES, &data, use_color, || {
        messages.iter().map(|(_, m)| format!("{}\n", m)).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vitrine::descriptor::{FieldDescriptor, FieldType, OptionItem};
    use vitrine::explorer::{Explorer, ExplorerConfig, ExplorerInput};
    use vitrine::filters::{FilterField, FilterSchema};
    use vitrine::pagination::PaginationState;
    use vitrine::settings::Settings;

    fn config() -> ExplorerConfig {
        ExplorerConfig::new(
            "Order",
            vec![
                FieldDescriptor::text("id", "Order"),
                FieldDescriptor::text("customer", "Customer"),
                FieldDescriptor::new("status", FieldType::Status, "Status").options(vec![
                    OptionItem::new("pending", "Pending").color("yellow"),
                    OptionItem::new("shipped", "Shipped").color("green"),
                ]),
            ],
        )
        .filters(FilterSchema::new(vec![
            FilterField::search("search", "Search"),
            FilterField::select(
                "status",
                "Status",
                vec![
                    OptionItem::new("pending", "Pending").color("yellow"),
                    OptionItem::new("shipped", "Shipped").color("green"),
                ],
            ),
        ]))
    }

    fn explorer(records: Vec<serde_json::Value>, total: u64) -> Explorer {
        let mut explorer = Explorer::new(config(), &Settings::default());
        let filters = explorer.input().filters.clone();
        explorer.set_input(ExplorerInput {
            pagination: PaginationState::new(1, 10, total),
            data: records,
            filters,
            ..Default::default()
        });
        explorer
    }

    fn orders() -> Vec<serde_json::Value> {
        vec![
            json!({ "id": 1, "customer": "Ada Lovelace", "status": "pending" }),
            json!({ "id": 2, "customer": "Grace Hopper", "status": "shipped" }),
        ]
    }

    #[test]
    fn table_has_header_rule_and_rows() {
        let view = explorer(orders(), 2).render();
        let output = render_explorer(&view, Some(false));
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("Order"));
        assert!(lines[0].contains("Customer"));
        assert!(lines[1].starts_with('─'));
        assert!(lines[2].contains("Ada Lovelace"));
        assert!(lines[2].ends_with("● Pending"));
        assert!(output.contains("Showing 1 to 2 of 2"));
    }

    #[test]
    fn table_columns_align() {
        let view = explorer(orders(), 2).render();
        let output = render_table(view.table.as_ref().unwrap(), Some(false));
        let lines: Vec<&str> = output.lines().collect();
        let col = lines[0].find("Customer").unwrap();
        assert_eq!(lines[2].find("Ada"), Some(col));
        assert_eq!(lines[3].find("Grace"), Some(col));
    }

    #[test]
    fn long_values_are_truncated() {
        let records = vec![json!({ "id": 1, "customer": "x".repeat(80), "status": "pending" })];
        let view = explorer(records, 1).render();
        let output = render_explorer(&view, Some(false));
        assert!(output.contains('…'));
        assert!(!output.contains(&"x".repeat(40)));
    }

    #[test]
    fn empty_list_shows_message() {
        let view = explorer(vec![], 0).render();
        let output = render_explorer(&view, Some(false));
        assert!(output.contains("No orders found"));
        assert!(output.contains("Showing 0 to 0 of 0"));
    }

    #[test]
    fn cards_on_mobile() {
        let mut explorer = explorer(orders(), 2);
        explorer.set_viewport_width(375);
        let output = render_explorer(&explorer.render(), Some(false));
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "1  ● Pending");
        assert!(lines[1].contains("Customer"));
        assert!(lines[1].ends_with("Ada Lovelace"));
        assert!(!output.contains('─'));
    }

    #[test]
    fn chips_render_with_remove_marker() {
        let mut explorer = explorer(orders(), 2);
        let mut input = explorer.input().clone();
        input.filters.set("search", "ada");
        input.filters.set("status", "pending");
        explorer.set_input(input);

        let output = render_explorer(&explorer.render(), Some(false));
        let first = output.lines().next().unwrap();
        assert!(first.contains("Search: ada ×"));
        assert!(first.contains("Status: Pending ×"));
    }

    #[test]
    fn pagination_marks_current_page() {
        let mut explorer = explorer(orders(), 200);
        let mut input = explorer.input().clone();
        input.pagination = PaginationState::new(10, 10, 200);
        explorer.set_input(input);

        let output = render_pagination(&explorer.render().pagination, Some(false));
        assert!(output.contains("Showing 91 to 100 of 200"));
        assert!(output.contains("[10]"));
        assert!(output.contains('…'));
        assert!(output.contains("10 per page"));
    }

    #[test]
    fn single_page_hides_page_numbers() {
        let view = explorer(orders(), 2).render();
        let output = render_pagination(&view.pagination, Some(false));
        assert!(!output.contains("[1]"));
    }

    #[test]
    fn panel_view_and_edit_modes() {
        let mut explorer = explorer(orders(), 2);
        explorer.open_detail("1").unwrap();

        let view = explorer.render().detail.unwrap().panel;
        let output = render_panel(&view, None, Some(false));
        assert!(output.starts_with("1  #1  viewing"));
        assert!(output.contains("Ada Lovelace"));

        explorer.toggle_edit().unwrap();
        explorer.edit_input("customer", "Ada King").unwrap();
        let view = explorer.render().detail.unwrap().panel;
        let output = render_panel(&view, Some("dry run"), Some(false));
        assert!(output.contains("editing"));
        assert!(output.contains("[Ada King]"));
        assert!(output.contains("[pending]  (pending/shipped)"));
        assert!(output.trim_end().ends_with("dry run"));
    }

    #[test]
    fn text_list_and_empty_message() {
        let lines = vec!["a = 1".to_string(), "b = 2".to_string()];
        assert_eq!(render_text_list(&lines, "none", Some(false)), "a = 1\nb = 2\n");
        assert_eq!(render_text_list(&[], "none", Some(false)), "none\n");
    }

    #[test]
    fn messages_plain() {
        let messages = vec![
            (MessageLevel::Success, "Saved order 1".to_string()),
            (MessageLevel::Warning, "careful".to_string()),
        ];
        assert_eq!(
            render_messages(&messages, Some(false)),
            "Saved order 1\ncareful\n"
        );
        assert_eq!(render_messages(&[], Some(false)), "");
    }

    #[test]
    fn renderer_is_shared_per_color_mode() {
        let plain = renderer(Some(false));
        assert!(std::ptr::eq(plain, renderer(Some(false))));
        assert!(!std::ptr::eq(plain, renderer(Some(true))));

        let data = TextListData {
            lines: vec!["x = 1".to_string()],
            empty_message: String::new(),
        };
        assert_eq!(plain.render(templates::TEXT_LIST, &data).unwrap(), "x = 1\n");
        assert!(plain.render("missing", &data).is_err());
    }
}
