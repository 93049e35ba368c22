//! # Command Handlers
//!
//! Each handler plays the host screen for one interaction:
//!
//! - `list`: builds the filter and paging state from flags, turning each flag
//!   into the explorer event a user click would produce, and applies those
//!   events against the data file the way a web host would
//! - `show`: opens one record in the detail panel
//! - `edit`: opens a record, enters edit mode, fills the buffer and saves it
//!   back through the data source
//! - `config`: reads and writes `config.json`
//!
//! Handlers never format output themselves; they hand view models to
//! `render.rs`, or print them as JSON with `--json`.

use super::render::{
    render_explorer, render_messages, render_panel, render_text_list, MessageLevel,
};
use super::setup::{Cli, Commands, ListArgs, Screen};
use clap::Parser;
use directories::ProjectDirs;
use futures::executor::block_on;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vitrine::error::{Result, VitrineError};
use vitrine::explorer::{Explorer, ExplorerConfig, ExplorerEvent, ExplorerInput};
use vitrine::filters::{FilterKind, SORT_ORDER_KEY};
use vitrine::source::{DataSource, MemorySource, Query};
use vitrine::settings::Settings;

const DRY_RUN_FOOTER: &str = "Dry run: changes were not saved";

struct AppContext {
    settings: Settings,
    config_dir: PathBuf,
    use_color: Option<bool>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Commands::List(args) => handle_list(&ctx, args),
        Commands::Show { screen, id, tab } => handle_show(&ctx, &screen, &id, tab.as_deref()),
        Commands::Edit {
            screen,
            id,
            assignments,
            dry_run,
        } => handle_edit(&ctx, &screen, &id, &assignments, dry_run),
        Commands::Config { key, value } => handle_config(&mut ctx, key, value),
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "vitrine=debug" } else { "vitrine=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let config_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => ProjectDirs::from("com", "vitrine", "vitrine")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| {
                VitrineError::Config("could not determine a config directory".to_string())
            })?,
    };
    let settings = Settings::load(&config_dir)?;
    tracing::debug!(config_dir = %config_dir.display(), "settings loaded");

    Ok(AppContext {
        settings,
        config_dir,
        use_color: cli.no_color.then_some(false),
    })
}

/// The host side of a screen: the data source and the query it was last asked.
struct Host {
    source: MemorySource,
    query: Query,
}

impl Host {
    /// Fetches the current query and hands the result to the explorer.
    fn refresh(&self, explorer: &mut Explorer) -> Result<()> {
        let page = self.source.fetch(&self.query)?;
        explorer.set_input(ExplorerInput {
            data: page.records,
            pagination: page.pagination,
            filters: self.query.filters.clone(),
            ..Default::default()
        });
        Ok(())
    }

    fn apply(&mut self, explorer: &mut Explorer, event: ExplorerEvent) -> Result<()> {
        tracing::debug!(?event, "applying explorer event");
        match event {
            ExplorerEvent::FilterChange(delta) => {
                self.query.filters = delta.apply_to(&self.query.filters);
                self.query.page = 1;
            }
            ExplorerEvent::ClearFilters { reset } => {
                self.query.filters = reset.apply_to(&self.query.filters);
                self.query.page = 1;
            }
            ExplorerEvent::PageChange(page) => self.query.page = page,
            ExplorerEvent::PageSizeChange(limit) => {
                self.query.limit = limit;
                self.query.page = 1;
            }
            other => {
                tracing::debug!(?other, "event has no effect on the list query");
                return Ok(());
            }
        }
        self.refresh(explorer)
    }
}

fn open_screen(ctx: &AppContext, screen: &Screen) -> Result<(Explorer, MemorySource)> {
    let config = ExplorerConfig::load(&screen.schema)?;
    let source = MemorySource::from_path(&screen.data, config.filters.clone())?;
    let mut explorer = Explorer::new(config, &ctx.settings);
    explorer.set_viewport_width(screen.width);
    Ok((explorer, source))
}

/// Key of the first filter field of the given kind.
fn filter_key(explorer: &Explorer, kind: FilterKind, flag: &str) -> Result<String> {
    explorer
        .config()
        .filters
        .fields
        .iter()
        .find(|field| field.kind() == kind)
        .map(|field| field.key().to_string())
        .ok_or_else(|| {
            VitrineError::Config(format!(
                "{} needs a {:?} filter in the schema",
                flag,
                kind
            ))
        })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_messages(ctx: &AppContext, messages: &[(MessageLevel, String)], json: bool) {
    let output = render_messages(messages, ctx.use_color);
    if output.is_empty() {
        return;
    }
    // keep stdout parseable in JSON mode
    if json {
        eprint!("{}", output);
    } else {
        print!("{}", output);
    }
}

fn handle_list(ctx: &AppContext, args: ListArgs) -> Result<()> {
    let (mut explorer, source) = open_screen(ctx, &args.screen)?;
    let limit = ctx.settings.page_sizes.first().copied().unwrap_or(10);
    let mut host = Host {
        source,
        query: Query::new(explorer.input().filters.clone(), 1, limit),
    };
    host.refresh(&mut explorer)?;
    let mut messages = Vec::new();

    let mut changes: Vec<(String, String)> = Vec::new();
    if let Some(term) = args.search {
        changes.push((filter_key(&explorer, FilterKind::Search, "--search")?, term));
    }
    changes.extend(args.filters);
    if let Some(sort_by) = args.sort_by {
        changes.push((filter_key(&explorer, FilterKind::Sort, "--sort-by")?, sort_by));
    }
    if let Some(order) = args.sort_order {
        changes.push((SORT_ORDER_KEY.to_string(), order.as_str().to_string()));
    }
    for (key, value) in changes {
        let event = explorer.change_filter(&key, value);
        host.apply(&mut explorer, event)?;
    }

    for key in &args.remove {
        match explorer.remove_chip(key) {
            Some(event) => host.apply(&mut explorer, event)?,
            None => messages.push((
                MessageLevel::Warning,
                format!("No active filter '{}' to remove", key),
            )),
        }
    }
    if args.clear {
        let event = explorer.clear_filters();
        host.apply(&mut explorer, event)?;
    }

    if let Some(event) = args.limit.and_then(|limit| explorer.change_page_size(limit)) {
        host.apply(&mut explorer, event)?;
    }
    if args.page != explorer.input().pagination.current_page {
        match explorer.go_to_page(args.page) {
            Some(event) => host.apply(&mut explorer, event)?,
            None => messages.push((
                MessageLevel::Warning,
                format!(
                    "Page {} is out of range (1-{})",
                    args.page,
                    explorer.input().pagination.total_pages.max(1)
                ),
            )),
        }
    }

    let view = explorer.render();
    if args.screen.json {
        print_json(&view)?;
    } else {
        print!("{}", render_explorer(&view, ctx.use_color));
    }
    print_messages(ctx, &messages, args.screen.json);
    Ok(())
}

/// Loads one record and opens it in the explorer's detail panel.
fn open_record(ctx: &AppContext, screen: &Screen, id: &str) -> Result<(Explorer, MemorySource)> {
    let (mut explorer, source) = open_screen(ctx, screen)?;
    explorer.set_input(ExplorerInput {
        data: vec![source.get(id)?],
        ..Default::default()
    });
    explorer.open_detail(id)?;
    Ok((explorer, source))
}

fn print_panel(
    ctx: &AppContext,
    explorer: &Explorer,
    json: bool,
    footer: Option<&str>,
) -> Result<()> {
    let Some(detail) = explorer.render().detail else {
        return Ok(());
    };
    if json {
        print_json(&detail)
    } else {
        print!("{}", render_panel(&detail.panel, footer, ctx.use_color));
        Ok(())
    }
}

fn handle_show(ctx: &AppContext, screen: &Screen, id: &str, tab: Option<&str>) -> Result<()> {
    let (mut explorer, _) = open_record(ctx, screen, id)?;

    if let Some(tab) = tab {
        if !explorer.select_tab(tab)? {
            let known: Vec<String> = explorer
                .panel()
                .map(|panel| panel.schema().tabs.iter().map(|t| t.id.clone()).collect())
                .unwrap_or_default();
            return Err(VitrineError::Config(format!(
                "unknown tab '{}' (expected one of: {})",
                tab,
                known.join(", ")
            )));
        }
    }

    print_panel(ctx, &explorer, screen.json, None)
}

fn handle_edit(
    ctx: &AppContext,
    screen: &Screen,
    id: &str,
    assignments: &[(String, String)],
    dry_run: bool,
) -> Result<()> {
    let (mut explorer, mut source) = open_record(ctx, screen, id)?;

    explorer.toggle_edit()?;
    for (key, raw) in assignments {
        explorer.edit_input(key, raw)?;
    }

    if dry_run {
        return print_panel(ctx, &explorer, screen.json, Some(DRY_RUN_FOOTER));
    }

    let event = block_on(explorer.save_detail(|data| {
        let outcome = source.update(id, data).map(|_| ());
        async move { outcome }
    }))?;
    tracing::debug!(?event, "record saved");
    source.save_to(&screen.data)?;

    explorer.set_input(ExplorerInput {
        data: vec![source.get(id)?],
        is_editing: Some(false),
        ..Default::default()
    });
    print_panel(ctx, &explorer, screen.json, None)?;

    let entity = explorer.config().entity_name.to_lowercase();
    print_messages(
        ctx,
        &[(MessageLevel::Success, format!("Saved {} {}", entity, id))],
        screen.json,
    );
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let mut messages = Vec::new();
    let lines = match (key, value) {
        (None, _) => Settings::KEYS
            .iter()
            .filter_map(|k| ctx.settings.get(k).map(|v| format!("{} = {}", k, v)))
            .collect(),
        (Some(key), None) => {
            let value = ctx.settings.get(&key).ok_or_else(|| {
                VitrineError::Config(format!(
                    "unknown setting '{}' (expected one of: {})",
                    key,
                    Settings::KEYS.join(", ")
                ))
            })?;
            vec![format!("{} = {}", key, value)]
        }
        (Some(key), Some(value)) => {
            ctx.settings.set(&key, &value)?;
            ctx.settings.save(&ctx.config_dir)?;
            messages.push((
                MessageLevel::Success,
                format!("Saved {} to {}", key, ctx.config_dir.display()),
            ));
            vec![format!("{} = {}", key, ctx.settings.get(&key).unwrap_or(value))]
        }
    };

    print!(
        "{}",
        render_text_list(&lines, "No configuration values.", ctx.use_color)
    );
    print_messages(ctx, &messages, false);
    Ok(())
}
