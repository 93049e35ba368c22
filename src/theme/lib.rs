//! # vitrine-theme - Tone-aware Styled Templates
//!
//! Vitrine views are headless: cells carry a semantic [`Tone`] ("yellow" for a
//! pending badge, "green" for a delivered status dot) instead of markup. This
//! crate turns those views into styled terminal text.
//!
//! ## Pieces
//!
//! - **Tones** are a closed palette. Option colors written for a web host
//!   (`"yellow"`, `"bg-red-100 text-red-800"`, `"gray"`) resolve to a tone with
//!   [`Tone::parse`]. Anything unrecognized is [`Tone::Neutral`].
//! - **Styles** are named `console::Style`s used for structural text (headers,
//!   dim separators, chips).
//! - **Templates** are minijinja templates using three filters:
//!   - `{{ text | style("header") }}` applies a named style
//!   - `{{ text | tone("yellow") }}` applies a tone (unknown tones render neutral)
//!   - `{{ text | pad(12) }}` fits text to a display width (truncating with `…`)
//!
//! ## Quick Example
//!
//! ```rust
//! use vitrine_theme::{render_with_color, Theme, ThemeChoice};
//! use console::Style;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Row { status: String, tone: String }
//!
//! let theme = Theme::new().add("header", Style::new().bold());
//! let out = render_with_color(
//!     r#"{{ status | pad(9) | tone(tone) }}|"#,
//!     &Row { status: "Pending".into(), tone: "yellow".into() },
//!     ThemeChoice::from(&theme),
//!     false,
//! ).unwrap();
//! assert_eq!(out, "Pending  |");
//! ```
//!
//! ## Terminal Detection
//!
//! [`render`] and [`Renderer::new`] ask `console` whether stdout supports
//! colors. When it does not (pipes, `TERM=dumb`), the `style` and `tone`
//! filters return plain text. [`render_with_color`] and
//! [`Renderer::with_color`] override detection, e.g. for a `--no-color` flag.

use console::{Style, Term};
use minijinja::{Environment, Error, Value};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Default prefix shown when a style name is not found.
pub const DEFAULT_MISSING_STYLE_INDICATOR: &str = "(!?)";

/// Semantic color of a cell, chip or status dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Neutral,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Indigo,
    Purple,
    Pink,
}

impl Tone {
    pub const ALL: [Tone; 9] = [
        Tone::Neutral,
        Tone::Red,
        Tone::Orange,
        Tone::Yellow,
        Tone::Green,
        Tone::Blue,
        Tone::Indigo,
        Tone::Purple,
        Tone::Pink,
    ];

    /// Lowercase name, as accepted by the `tone` template filter.
    pub fn name(self) -> &'static str {
        match self {
            Tone::Neutral => "neutral",
            Tone::Red => "red",
            Tone::Orange => "orange",
            Tone::Yellow => "yellow",
            Tone::Green => "green",
            Tone::Blue => "blue",
            Tone::Indigo => "indigo",
            Tone::Purple => "purple",
            Tone::Pink => "pink",
        }
    }

    /// Resolves a free-form color string to a tone.
    ///
    /// The string is split into alphabetic words and the first word naming a
    /// palette entry wins, so utility-class strings such as
    /// `"bg-green-100 text-green-800"` resolve to [`Tone::Green`].
    /// Gray-ish names and unknown strings are [`Tone::Neutral`].
    pub fn parse(color: &str) -> Tone {
        color
            .split(|c: char| !c.is_ascii_alphabetic())
            .filter(|word| !word.is_empty())
            .find_map(|word| Tone::from_word(&word.to_ascii_lowercase()))
            .unwrap_or(Tone::Neutral)
    }

    fn from_word(word: &str) -> Option<Tone> {
        let tone = match word {
            "gray" | "grey" | "slate" | "zinc" | "neutral" | "stone" => Tone::Neutral,
            "red" | "rose" => Tone::Red,
            "orange" | "amber" => Tone::Orange,
            "yellow" => Tone::Yellow,
            "green" | "emerald" | "lime" | "teal" => Tone::Green,
            "blue" | "sky" | "cyan" => Tone::Blue,
            "indigo" => Tone::Indigo,
            "purple" | "violet" | "fuchsia" => Tone::Purple,
            "pink" => Tone::Pink,
            _ => return None,
        };
        Some(tone)
    }

    fn default_style(self) -> Style {
        match self {
            Tone::Neutral => Style::new().color256(rgb_to_ansi256((154, 154, 154))),
            Tone::Red => Style::new().red(),
            Tone::Orange => Style::new().color256(rgb_to_ansi256((255, 135, 0))),
            Tone::Yellow => Style::new().yellow(),
            Tone::Green => Style::new().green(),
            Tone::Blue => Style::new().blue(),
            Tone::Indigo => Style::new().color256(rgb_to_ansi256((95, 95, 215))),
            Tone::Purple => Style::new().magenta(),
            Tone::Pink => Style::new().color256(rgb_to_ansi256((255, 135, 175))),
        }
    }
}

/// A collection of named styles.
///
/// When a style name is not found, a configurable indicator is prepended to
/// the text to help catch typos in templates (defaults to `(!?)`).
#[derive(Clone)]
pub struct Styles {
    styles: HashMap<String, Style>,
    missing_indicator: String,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            styles: HashMap::new(),
            missing_indicator: DEFAULT_MISSING_STYLE_INDICATOR.to_string(),
        }
    }
}

impl Styles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indicator prepended to text styled with an unknown name.
    /// An empty indicator disables it.
    pub fn missing_indicator(mut self, indicator: &str) -> Self {
        self.missing_indicator = indicator.to_string();
        self
    }

    /// Adds (or replaces) a named style.
    pub fn add(mut self, name: &str, style: Style) -> Self {
        self.styles.insert(name.to_string(), style);
        self
    }

    /// Applies a named style, with ANSI codes when `use_color` is set.
    pub fn apply(&self, name: &str, text: &str, use_color: bool) -> String {
        match self.styles.get(name) {
            Some(style) if use_color => style.apply_to(text).to_string(),
            Some(_) => text.to_string(),
            None if self.missing_indicator.is_empty() => text.to_string(),
            None => format!("{} {}", self.missing_indicator, text),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// Named styles plus the tone palette used when rendering templates.
#[derive(Clone)]
pub struct Theme {
    styles: Styles,
    tones: HashMap<Tone, Style>,
}

impl Theme {
    /// Creates a theme with no named styles and the default tone palette.
    pub fn new() -> Self {
        Self::from_styles(Styles::new())
    }

    pub fn from_styles(styles: Styles) -> Self {
        let tones = Tone::ALL
            .iter()
            .map(|tone| (*tone, tone.default_style()))
            .collect();
        Self { styles, tones }
    }

    /// Adds a named style, returning the updated theme for chaining.
    pub fn add(mut self, name: &str, style: Style) -> Self {
        self.styles = self.styles.add(name, style);
        self
    }

    /// Overrides the style used for one tone.
    pub fn tone(mut self, tone: Tone, style: Style) -> Self {
        self.tones.insert(tone, style);
        self
    }

    pub fn styles(&self) -> &Styles {
        &self.styles
    }

    /// Applies a tone. Tones missing from the palette fall back to neutral.
    pub fn apply_tone(&self, tone: Tone, text: &str, use_color: bool) -> String {
        if !use_color {
            return text.to_string();
        }
        match self.tones.get(&tone).or_else(|| self.tones.get(&Tone::Neutral)) {
            Some(style) => style.apply_to(text).to_string(),
            None => text.to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

/// A theme that adapts to the user's light/dark display mode.
#[derive(Clone)]
pub struct AdaptiveTheme {
    light: Theme,
    dark: Theme,
}

impl AdaptiveTheme {
    pub fn new(light: Theme, dark: Theme) -> Self {
        Self { light, dark }
    }

    fn resolve(&self) -> Theme {
        match detect_color_mode() {
            ColorMode::Light => self.light.clone(),
            ColorMode::Dark => self.dark.clone(),
        }
    }
}

/// Reference to either a static theme or an adaptive theme.
pub enum ThemeChoice<'a> {
    Theme(&'a Theme),
    Adaptive(&'a AdaptiveTheme),
}

impl ThemeChoice<'_> {
    fn resolve(&self) -> Theme {
        match self {
            ThemeChoice::Theme(theme) => (*theme).clone(),
            ThemeChoice::Adaptive(adaptive) => adaptive.resolve(),
        }
    }
}

impl<'a> From<&'a Theme> for ThemeChoice<'a> {
    fn from(theme: &'a Theme) -> Self {
        ThemeChoice::Theme(theme)
    }
}

impl<'a> From<&'a AdaptiveTheme> for ThemeChoice<'a> {
    fn from(adaptive: &'a AdaptiveTheme) -> Self {
        ThemeChoice::Adaptive(adaptive)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Light,
    Dark,
}

type ThemeDetector = fn() -> ColorMode;

fn system_color_mode() -> ColorMode {
    match dark_light::detect() {
        dark_light::Mode::Dark => ColorMode::Dark,
        _ => ColorMode::Light,
    }
}

static THEME_DETECTOR: Lazy<Mutex<ThemeDetector>> =
    Lazy::new(|| Mutex::new(system_color_mode as ThemeDetector));

/// Overrides the light/dark detector. Useful for testing.
pub fn set_theme_detector(detector: ThemeDetector) {
    let mut guard = THEME_DETECTOR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = detector;
}

fn detect_color_mode() -> ColorMode {
    let detector = THEME_DETECTOR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    (*detector)()
}

/// Fits `text` to exactly `width` display columns.
///
/// Longer text is cut and ends with `…`; shorter text is right-padded with
/// spaces. Wide characters (CJK, emoji) count as two columns.
pub fn fit_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        let padding = width - text.width();
        return format!("{}{}", text, " ".repeat(padding));
    }
    if width == 0 {
        return String::new();
    }

    let limit = width - 1;
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > limit {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

/// Renders a template with automatic terminal color detection.
pub fn render<T: Serialize>(
    template: &str,
    data: &T,
    theme: ThemeChoice<'_>,
) -> Result<String, Error> {
    let use_color = Term::stdout().features().colors_supported();
    render_with_color(template, data, theme, use_color)
}

/// Renders a template with explicit color control.
///
/// ```rust
/// use vitrine_theme::{render_with_color, Theme, ThemeChoice};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Data { label: String }
///
/// let theme = Theme::new();
/// let plain = render_with_color(
///     r#"{{ label | tone("green") }}"#,
///     &Data { label: "Delivered".into() },
///     ThemeChoice::from(&theme),
///     false,
/// ).unwrap();
/// assert_eq!(plain, "Delivered");
/// ```
pub fn render_with_color<T: Serialize>(
    template: &str,
    data: &T,
    theme: ThemeChoice<'_>,
    use_color: bool,
) -> Result<String, Error> {
    let mut env = Environment::new();
    register_filters(&mut env, theme.resolve(), use_color);

    env.add_template_owned("_inline".to_string(), template.to_string())?;
    let tmpl = env.get_template("_inline")?;
    tmpl.render(data)
}

/// A renderer with pre-registered templates, compiled once and reused.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Creates a renderer with automatic color detection.
    pub fn new(theme: ThemeChoice<'_>) -> Self {
        let use_color = Term::stdout().features().colors_supported();
        Self::with_color(theme, use_color)
    }

    pub fn with_color(theme: ThemeChoice<'_>, use_color: bool) -> Self {
        let mut env = Environment::new();
        register_filters(&mut env, theme.resolve(), use_color);
        Self { env }
    }

    /// Registers a named template. Syntax errors are reported immediately.
    pub fn add_template(&mut self, name: &str, source: &str) -> Result<(), Error> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())
    }

    /// Renders a registered template.
    ///
    /// # Errors
    ///
    /// Returns an error if the template name is unknown or rendering fails.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, Error> {
        let tmpl = self.env.get_template(name)?;
        tmpl.render(data)
    }
}

fn register_filters(env: &mut Environment<'static>, theme: Theme, use_color: bool) {
    let styles = theme.styles.clone();
    env.add_filter("style", move |value: Value, name: String| -> String {
        styles.apply(&name, &value.to_string(), use_color)
    });
    env.add_filter("tone", move |value: Value, tone: String| -> String {
        theme.apply_tone(Tone::parse(&tone), &value.to_string(), use_color)
    });
    env.add_filter("pad", |value: Value, width: usize| -> String {
        fit_width(&value.to_string(), width)
    });
}

/// Converts an RGB triplet to the nearest ANSI 256-color palette index.
pub fn rgb_to_ansi256((r, g, b): (u8, u8, u8)) -> u8 {
    let is_gray = r == g && g == b;
    if is_gray {
        return match r {
            0..=7 => 16,
            249..=255 => 231,
            level => 232 + ((level as u16 - 8) * 24 / 247) as u8,
        };
    }
    let scale = |channel: u8| (channel as u16 * 5 / 255) as u8;
    16 + 36 * scale(r) + 6 * scale(g) + scale(b)
}
