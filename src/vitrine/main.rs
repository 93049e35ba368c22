//! # Vitrine CLI
//!
//! A reference host screen for the vitrine engine. It plays the role a web
//! page plays in production: it owns the records (a JSON file), the filter
//! and pagination state (command-line flags), and the data source. The
//! engine turns that into view models, and the CLI prints them through
//! `vitrine-theme` templates.
//!
//! The binary is intentionally thin: everything lives in `cli/`, and this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ```text
//! vitrine list demos/products.json --schema demos/products.schema.json --search shoe
//! vitrine show demos/products.json --schema demos/products.schema.json 3 --tab pricing
//! vitrine edit demos/products.json --schema demos/products.schema.json 3 --set price=12.5
//! vitrine config date_style iso
//! ```
//!
//! Logs go to stderr (`RUST_LOG`, or `--verbose` for debug output) so stdout
//! stays clean for the rendered view.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
