use afs::api::AfsApi;
use afs::config::AfsConfig;
use afs::error::{AfsError, Result};
use afs::events::FilterEvent;
use afs::model::Catalog;
use afs::range::RangeFilter;
use afs::sort::SortSpec;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod args;
mod cli;
use args::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so `--json` output stays parseable. `RUST_LOG` wins
/// over the default level.
fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Eval {
            catalog,
            config,
            toggles,
            controls,
            search,
            ranges,
            sort,
            page,
            json,
        } => handle_eval(EvalArgs {
            catalog,
            config,
            toggles,
            controls,
            search,
            ranges,
            sort,
            page,
            json,
        }),
        Commands::Config { path } => handle_config(&path),
    }
}

struct EvalArgs {
    catalog: PathBuf,
    config: Option<PathBuf>,
    toggles: Vec<String>,
    controls: Vec<String>,
    search: Option<String>,
    ranges: Vec<RangeFilter>,
    sort: Option<SortSpec>,
    page: Option<usize>,
    json: bool,
}

fn load_config(path: &Path) -> Result<AfsConfig> {
    if !path.is_file() {
        return Err(AfsError::Config(format!(
            "config file not found: {}",
            path.display()
        )));
    }
    AfsConfig::load(path)
}

/// Replays the requested actions in a fixed order: token toggles, control
/// toggles, search, ranges, sort, page. Malformed toggles are skipped.
fn handle_eval(eval: EvalArgs) -> Result<()> {
    let catalog = Catalog::load(&eval.catalog)?;
    let config = match &eval.config {
        Some(path) => load_config(path)?,
        None => AfsConfig::default(),
    };

    let sink = |event: FilterEvent| tracing::debug!(event = event.name(), "emitted");
    let mut api = AfsApi::from_catalog(config, catalog, sink);
    let mut view = api.apply();

    for raw in &eval.toggles {
        match args::parse_toggle(raw) {
            Ok(request) => view = api.toggle(request),
            Err(e) => tracing::warn!(toggle = raw.as_str(), error = %e, "ignoring toggle"),
        }
    }
    for id in &eval.controls {
        view = api.toggle_control(id);
    }
    if let Some(term) = &eval.search {
        view = api.search(term);
    }
    for range in eval.ranges {
        view = api.add_range(range);
    }
    if let Some(spec) = eval.sort {
        view = api.sort_by(spec);
    }
    if let Some(page) = eval.page {
        view = api.go_to_page(page);
    }

    if eval.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    cli::print::print_diagnostics(api.diagnostics());
    cli::print::print_view(&view, api.items(), api.active_filter_mode());
    Ok(())
}

fn handle_config(path: &Path) -> Result<()> {
    let config = load_config(path)?;
    let logic = config.resolve();
    cli::print::print_logic(&logic);
    cli::print::print_diagnostics(&logic.diagnostics);
    Ok(())
}
