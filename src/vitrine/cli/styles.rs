//! Styles for the vitrine CLI.
//!
//! Templates refer to semantic style names (`header`, `chip`, `page-current`)
//! and never to colors. Cell colors are different: they come from the data,
//! as the [`Tone`](vitrine::Tone) of a badge or status dot, and go through
//! the `tone` filter instead.
//!
//! Two palettes are defined, one per terminal background, and the adaptive
//! theme picks one at render time.

use console::Style;
use once_cell::sync::Lazy;
use vitrine_theme::{rgb_to_ansi256, AdaptiveTheme, Theme};

/// Style identifiers shared between templates and renderers.
pub mod names {
    pub const REGULAR: &str = "regular";
    pub const MUTED: &str = "muted";
    pub const FAINT: &str = "faint";
    pub const TITLE: &str = "title";
    pub const HEADER: &str = "header";
    pub const LABEL: &str = "label";
    pub const CHIP: &str = "chip";
    pub const PAGE_CURRENT: &str = "page-current";
    pub const TAB_ACTIVE: &str = "tab-active";
    pub const MODE: &str = "mode";
    pub const SUCCESS: &str = "success";
    pub const WARNING: &str = "warning";
    pub const ERROR: &str = "error";
}

pub static VITRINE_THEME: Lazy<AdaptiveTheme> =
    Lazy::new(|| AdaptiveTheme::new(build_light_theme(), build_dark_theme()));

fn build_light_theme() -> Theme {
    let regular = Style::new().black();
    let muted = Style::new().color256(rgb_to_ansi256((115, 115, 115)));
    let faint = Style::new().color256(rgb_to_ansi256((173, 173, 173)));
    let accent = Style::new().color256(rgb_to_ansi256((0, 95, 175)));

    Theme::new()
        .add(names::REGULAR, regular.clone())
        .add(names::MUTED, muted.clone())
        .add(names::FAINT, faint)
        .add(names::TITLE, regular.clone().bold())
        .add(names::HEADER, regular.bold().underlined())
        .add(names::LABEL, muted)
        .add(
            names::CHIP,
            Style::new()
                .black()
                .on_color256(rgb_to_ansi256((220, 230, 245))),
        )
        .add(names::PAGE_CURRENT, accent.clone().bold().reverse())
        .add(names::TAB_ACTIVE, accent.bold().underlined())
        .add(names::MODE, Style::new().magenta().italic())
        .add(names::SUCCESS, Style::new().green())
        .add(names::WARNING, Style::new().yellow().bold())
        .add(names::ERROR, Style::new().red().bold())
}

fn build_dark_theme() -> Theme {
    let regular = Style::new().white();
    let muted = Style::new().color256(rgb_to_ansi256((180, 180, 180)));
    let faint = Style::new().color256(rgb_to_ansi256((110, 110, 110)));
    let accent = Style::new().color256(rgb_to_ansi256((135, 175, 255)));

    Theme::new()
        .add(names::REGULAR, regular.clone())
        .add(names::MUTED, muted.clone())
        .add(names::FAINT, faint)
        .add(names::TITLE, regular.clone().bold())
        .add(names::HEADER, regular.bold().underlined())
        .add(names::LABEL, muted)
        .add(
            names::CHIP,
            Style::new()
                .white()
                .on_color256(rgb_to_ansi256((48, 64, 96))),
        )
        .add(names::PAGE_CURRENT, accent.clone().bold().reverse())
        .add(names::TAB_ACTIVE, accent.bold().underlined())
        .add(names::MODE, Style::new().magenta().italic())
        .add(names::SUCCESS, Style::new().green())
        .add(names::WARNING, Style::new().yellow().bold())
        .add(names::ERROR, Style::new().red().bold())
}
