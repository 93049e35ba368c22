//! # Settings
//!
//! Engine-wide presentation settings, stored as `config.json` in a config
//! directory. Every key has a compiled default, so a missing file (or a
//! missing key inside the file) is never an error.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `currency` | `USD` | ISO code shown next to currency cells in detail views |
//! | `currency_symbol` | `$` | Prefix used by the currency renderer |
//! | `date_style` | `medium` | `medium` (`Jan 5, 2024`), `iso` (`2024-01-05`) or `relative` |
//! | `mobile_max` | `768` | First viewport width that is no longer mobile |
//! | `desktop_min` | `1024` | First viewport width that is desktop |
//! | `drawer_max_width` | `640` | Detail panel width on tablet/desktop |
//! | `page_sizes` | `[10, 20, 50, 100]` | Choices offered by the page-size selector |
//! | `image_placeholder` | `/placeholder.png` | Asset swapped in for broken images |

use crate::error::{Result, VitrineError};
use crate::layout::Breakpoints;
use crate::render::RenderOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

const CONFIG_FILENAME: &str = "config.json";

/// How date cells are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// `Jan 5, 2024`
    #[default]
    Medium,
    /// `2024-01-05`
    Iso,
    /// `3 days ago`
    Relative,
}

impl FromStr for DateStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "medium" => Ok(DateStyle::Medium),
            "iso" => Ok(DateStyle::Iso),
            "relative" => Ok(DateStyle::Relative),
            other => Err(format!("unknown date style '{}'", other)),
        }
    }
}

impl fmt::Display for DateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DateStyle::Medium => "medium",
            DateStyle::Iso => "iso",
            DateStyle::Relative => "relative",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    #[serde(default)]
    pub date_style: DateStyle,

    #[serde(default = "default_mobile_max")]
    pub mobile_max: u32,

    #[serde(default = "default_desktop_min")]
    pub desktop_min: u32,

    #[serde(default = "default_drawer_max_width")]
    pub drawer_max_width: u32,

    #[serde(default = "default_page_sizes")]
    pub page_sizes: Vec<u32>,

    #[serde(default = "default_image_placeholder")]
    pub image_placeholder: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_mobile_max() -> u32 {
    768
}

fn default_desktop_min() -> u32 {
    1024
}

fn default_drawer_max_width() -> u32 {
    640
}

fn default_page_sizes() -> Vec<u32> {
    vec![10, 20, 50, 100]
}

fn default_image_placeholder() -> String {
    "/placeholder.png".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            currency_symbol: default_currency_symbol(),
            date_style: DateStyle::default(),
            mobile_max: default_mobile_max(),
            desktop_min: default_desktop_min(),
            drawer_max_width: default_drawer_max_width(),
            page_sizes: default_page_sizes(),
            image_placeholder: default_image_placeholder(),
        }
    }
}

impl Settings {
    pub const KEYS: [&'static str; 8] = [
        "currency",
        "currency_symbol",
        "date_style",
        "mobile_max",
        "desktop_min",
        "drawer_max_width",
        "page_sizes",
        "image_placeholder",
    ];

    /// Load settings from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.desktop_min <= self.mobile_max {
            return Err(VitrineError::Config(format!(
                "desktop_min ({}) must be greater than mobile_max ({})",
                self.desktop_min, self.mobile_max
            )));
        }
        if self.page_sizes.is_empty() || self.page_sizes.contains(&0) {
            return Err(VitrineError::Config(
                "page_sizes must be a non-empty list of positive numbers".to_string(),
            ));
        }
        Ok(())
    }

    /// Current value of a key, formatted for display.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "currency" => self.currency.clone(),
            "currency_symbol" => self.currency_symbol.clone(),
            "date_style" => self.date_style.to_string(),
            "mobile_max" => self.mobile_max.to_string(),
            "desktop_min" => self.desktop_min.to_string(),
            "drawer_max_width" => self.drawer_max_width.to_string(),
            "page_sizes" => self
                .page_sizes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
            "image_placeholder" => self.image_placeholder.clone(),
            _ => return None,
        };
        Some(value)
    }

    /// Parses and sets a key. The result must still validate.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut next = self.clone();
        match key {
            "currency" => next.currency = value.to_ascii_uppercase(),
            "currency_symbol" => next.currency_symbol = value.to_string(),
            "date_style" => next.date_style = value.parse().map_err(VitrineError::Config)?,
            "mobile_max" => next.mobile_max = parse_number(key, value)?,
            "desktop_min" => next.desktop_min = parse_number(key, value)?,
            "drawer_max_width" => next.drawer_max_width = parse_number(key, value)?,
            "page_sizes" => {
                next.page_sizes = value
                    .split(',')
                    .map(|part| parse_number(key, part.trim()))
                    .collect::<Result<Vec<_>>>()?
            }
            "image_placeholder" => next.image_placeholder = value.to_string(),
            other => {
                return Err(VitrineError::Config(format!(
                    "unknown setting '{}' (expected one of: {})",
                    other,
                    Self::KEYS.join(", ")
                )))
            }
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub fn breakpoints(&self) -> Breakpoints {
        Breakpoints::new(self.mobile_max, self.desktop_min)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            currency_symbol: self.currency_symbol.clone(),
            date_style: self.date_style,
            image_placeholder: self.image_placeholder.clone(),
        }
    }
}

fn parse_number(key: &str, value: &str) -> Result<u32> {
    value
        .parse()
        .map_err(|_| VitrineError::Config(format!("{} expects a number, got '{}'", key, value)))
}
