use afs::model::ControlKind;
use afs::range::RangeFilter;
use afs::sort::SortSpec;
use afs::toggle::ToggleRequest;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "afs", version)]
#[command(about = "Filter, search, sort and page an item catalog", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a catalog under a sequence of filter actions
    #[command(alias = "e")]
    Eval {
        /// Catalog JSON file: {"items": [...], "controls": [...]}
        catalog: PathBuf,

        /// Configuration JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Toggle a token: TOKEN[@kind[@group]] (kind: button, checkbox, radio, select)
        #[arg(short, long = "toggle")]
        toggles: Vec<String>,

        /// Toggle a registered control by id
        #[arg(long = "control")]
        controls: Vec<String>,

        /// Search term
        #[arg(short, long)]
        search: Option<String>,

        /// Range filter: FIELD=MIN..MAX (either end may be empty)
        #[arg(short, long = "range")]
        ranges: Vec<RangeFilter>,

        /// Sort: FIELD[:asc|:desc]
        #[arg(long)]
        sort: Option<SortSpec>,

        /// Page to show (1-based)
        #[arg(short, long)]
        page: Option<usize>,

        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the normalised filter logic of a configuration file
    Config {
        /// Configuration JSON file
        path: PathBuf,
    },
}

/// Parses `TOKEN[@kind[@group]]`. The kind defaults to `button`.
pub fn parse_toggle(s: &str) -> Result<ToggleRequest, String> {
    let mut parts = s.splitn(3, '@');
    let token = parts.next().unwrap_or_default();
    let kind = match parts.next() {
        Some(kind) => kind.parse::<ControlKind>().map_err(|e| e.to_string())?,
        None => ControlKind::Button,
    };

    let request = ToggleRequest::parse(token, kind).map_err(|e| e.to_string())?;
    Ok(match parts.next() {
        Some(group) if !group.is_empty() => request.in_group(group),
        _ => request,
    })
}
