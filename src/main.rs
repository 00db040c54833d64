// censusview: browse ACS language-use and WIC coverage tables in the terminal.
// Parses the command line, loads config, and runs the TUI or a print command.

mod app;
mod cache;
mod census;
mod config;
mod data;
mod error;
mod logging;
mod print;
mod reference;
mod report;
mod state;
mod ui;

use std::io::{self, stdout};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};

use crate::app::App;
use crate::census::CensusClient;
use crate::config::Config;
use crate::data::Dataset;
use crate::logging::LogTarget;
use crate::reference::{
    GeoOption, filter_options, find_state, find_tribal_area, state_fips_codes, tribal_area_names,
};
use crate::report::Reports;

#[derive(Parser)]
#[command(
    name = "censusview",
    version,
    about = "Browse ACS language-use and WIC coverage tables by state and tribal area"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Config file. Defaults to the platform config dir.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// ACS dataset, e.g. acs5.
    #[arg(long, global = true)]
    dataset: Option<String>,

    /// ACS vintage year.
    #[arg(long, global = true)]
    year: Option<u16>,

    /// Census API key (also read from CENSUS_API_KEY).
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// CSV export of the WIC coverage-rate sheet.
    #[arg(long, global = true)]
    wic_file: Option<PathBuf>,

    /// Speaker shares above this fraction are highlighted.
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Cache directory. Defaults to the platform cache dir.
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Re-download tables even if cached.
    #[arg(long, global = true, default_value_t = false)]
    refresh: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive browser (default).
    Browse,
    /// Print the report for a state, by name or FIPS code.
    State {
        /// State name or two-digit FIPS code.
        state: String,
    },
    /// Print the report for a tribal area.
    Tribe {
        /// Exact tribal area name (see `censusview tribes`).
        name: String,
    },
    /// List states and their FIPS codes.
    States,
    /// List tribal area names.
    Tribes {
        /// Only names containing this text.
        #[arg(long)]
        filter: Option<String>,
    },
    /// Delete cached census tables.
    ClearCache {
        /// Every dataset and year, not just the configured one.
        #[arg(long, default_value_t = false)]
        all: bool,
    },
}

impl Cli {
    /// Command-line flags win over the config file.
    fn apply(&self, config: &mut Config) {
        if let Some(dataset) = &self.dataset {
            config.dataset = dataset.clone();
        }
        if let Some(year) = self.year {
            config.year = year;
        }
        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(path) = &self.wic_file {
            config.wic_coverage_path = path.clone();
        }
        if let Some(threshold) = self.threshold {
            config.highlight_threshold = threshold;
        }
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = Some(dir.clone());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("failed to load config")?;
    cli.apply(&mut config);
    config.validate()?;

    let cache_root = config.cache_dir.clone().or_else(cache::cache_dir);
    let command = cli.command.unwrap_or(Command::Browse);

    let log_target = match command {
        // The terminal belongs to the TUI; without a cache dir there is nowhere to log.
        Command::Browse => cache_root
            .as_deref()
            .map(|root| LogTarget::File(cache::log_path(root))),
        _ => Some(LogTarget::Stderr),
    };
    if let Some(target) = log_target {
        logging::init(&config.log_level, target)?;
    }

    match command {
        Command::Browse => {
            let reports = build_reports(&config, cache_root, cli.refresh)?;
            run_tui(reports)?;
        }
        Command::State { state } => {
            let option = find_state(&state)
                .ok_or_else(|| anyhow!("unknown state {:?} (see `censusview states`)", state))?;
            let reports = build_reports(&config, cache_root, cli.refresh)?;
            let report = reports.state_report(&option.key).await?;
            print!("{}", print::format_report(&report));
        }
        Command::Tribe { name } => {
            let option = find_tribal_area(&name).ok_or_else(|| {
                anyhow!(
                    "unknown tribal area {:?} (see `censusview tribes --filter`)",
                    name
                )
            })?;
            let reports = build_reports(&config, cache_root, cli.refresh)?;
            let report = reports.tribal_report(&option.key).await?;
            print!("{}", print::format_report(&report));
        }
        Command::States => print!("{}", print::format_options(&state_fips_codes())),
        Command::Tribes { filter } => {
            let options = tribal_area_names();
            let matching: Vec<GeoOption> = filter_options(&options, filter.as_deref().unwrap_or(""))
                .into_iter()
                .map(|i| options[i].clone())
                .collect();
            print!("{}", print::format_options(&matching));
        }
        Command::ClearCache { all } => {
            let root = cache_root.ok_or_else(|| anyhow!("no cache directory available"))?;
            let dir = if all {
                cache::tables_dir(&root)
            } else {
                cache::vintage_dir(&root, &config.dataset, config.year)
            };
            cache::delete_dir(&dir)?;
            info!(dir = %dir.display(), "cache cleared");
            println!("Removed {}", dir.display());
        }
    }

    Ok(())
}

fn build_reports(
    config: &Config,
    cache_root: Option<PathBuf>,
    refresh: bool,
) -> Result<Reports<CensusClient>> {
    if config.api_key.is_none() {
        warn!("no census API key configured; requests are rate limited");
    }

    let mut client = CensusClient::new(&config.dataset, config.year, config.api_key.clone())?;
    if let Some(base_url) = &config.api_base_url {
        client = client.with_base_url(base_url.clone());
    }

    let mut dataset = Dataset::new(client, &config.dataset, config.year).with_refresh(refresh);
    match cache_root {
        Some(root) => dataset = dataset.with_disk_cache(root),
        None => warn!("no cache directory available; tables are kept in memory only"),
    }

    Ok(Reports::new(
        dataset,
        config.wic_coverage_path.clone(),
        config.highlight_threshold,
    ))
}

fn run_tui(reports: Reports<CensusClient>) -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut app = App::new(reports);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.map_err(Into::into)
}
