use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "vitrine",
    bin_name = "vitrine",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Schema-driven tables, cards and detail panels for JSON records", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding config.json (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub config_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true, help_heading = "Options")]
    pub no_color: bool,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

/// Where records and the screen schema come from.
#[derive(Args, Debug, Clone)]
pub struct Screen {
    /// JSON file holding an array of records
    pub data: PathBuf,

    /// JSON file holding the explorer config (columns, filters, mobile, detail)
    #[arg(long, short = 's', value_name = "FILE")]
    pub schema: PathBuf,

    /// Viewport width in pixels; below the desktop breakpoint records render as cards
    #[arg(long, short = 'w', default_value_t = 1280)]
    pub width: u32,

    /// Print the view model as JSON instead of rendering it
    #[arg(long)]
    pub json: bool,
}

/// Host-side state of the list screen: paging and filter values.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub screen: Screen,

    /// Page to show (1-based)
    #[arg(long, short = 'p', default_value_t = 1)]
    pub page: u32,

    /// Records per page (defaults to the first configured page size)
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Search term, applied to the schema's search filter
    #[arg(long)]
    pub search: Option<String>,

    /// Filter value as key=value (repeatable)
    #[arg(long = "filter", short = 'f', value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub filters: Vec<(String, String)>,

    /// Key to sort by, applied to the schema's sort filter
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort direction
    #[arg(long, value_enum)]
    pub sort_order: Option<SortOrder>,

    /// Remove the active filter with this key before listing (repeatable)
    #[arg(long = "remove", value_name = "KEY")]
    pub remove: Vec<String>,

    /// Reset every filter to its default
    #[arg(long)]
    pub clear: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List records as a table or cards, with filter chips and pagination
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one record in the detail panel
    #[command(alias = "view")]
    Show {
        #[command(flatten)]
        screen: Screen,

        /// Record id
        id: String,

        /// Detail tab to select
        #[arg(long, short = 't')]
        tab: Option<String>,
    },

    /// Edit fields of one record and save it back to the data file
    Edit {
        #[command(flatten)]
        screen: Screen,

        /// Record id
        id: String,

        /// Field assignment as key=value (repeatable, dot paths allowed)
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value, required = true)]
        assignments: Vec<(String, String)>,

        /// Show the panel in edit mode without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Get or set configuration values
    Config {
        /// Configuration key (e.g., date_style)
        key: Option<String>,

        /// Value to set
        value: Option<String>,
    },
}

pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}
