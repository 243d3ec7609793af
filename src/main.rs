//! site-data command line.
//!
//! # Architecture Overview
//!
//! ```text
//!   spreadsheet sheets ─┐                      ┌─▶ fetch / config / view
//!   local CSV files ────┼─▶ DataStore ─────────┤
//!   master document ────┘    │  ▲              └─▶ apply (ConfigApplier)
//!                            ▼  │
//!                       LocalStorage (cache file)
//!                            ▲
//!   version sheet ──▶ VersionGate (purge on change)
//!
//!   sync / diff: sheets + assets/images ──▶ SyncEngine ──▶ master document
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use site_data::config::{load_or_default, SiteDataConfig};
use site_data::data::{DataStore, FetchOptions, ResourceType};
use site_data::net::{SourceFetcher, SourceLocation, SourceMap};
use site_data::observability::{logging, metrics};
use site_data::page::{ConfigApplier, Document, Strictness};
use site_data::resilience::timeouts::Budget;
use site_data::sync::SyncEngine;
use site_data::views::{
    hero_images, logo_images, portfolio_images, team, AccessGate, DialogSchedule, FilterMode,
    HomeCategory, ProfileCard, RenderOptions, ReviewCard, ServiceCatalog,
};

#[derive(Parser)]
#[command(name = "site-data")]
#[command(about = "Fetch, cache and apply website content data", long_about = None)]
struct Cli {
    /// Configuration file (TOML). Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bypass every cache read for this run.
    #[arg(long)]
    nocache: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the rows of one resource type as JSON
    Fetch { resource: ResourceType },
    /// Check the version marker (master document, else version sheet) and purge the cache if it moved
    CheckVersion,
    /// Print the site configuration mapping
    Config,
    /// Bind configuration onto an HTML page and print the result
    Apply {
        html: PathBuf,
        /// Report markers that have no configuration value
        #[arg(long)]
        strict: bool,
    },
    /// List cache keys
    Cache,
    /// Print the view model of a page section
    View {
        section: ViewSection,
        /// Category to include (or exclude with --exclude)
        #[arg(long)]
        filter: Option<String>,
        #[arg(long)]
        exclude: bool,
        /// URL fragment selecting a services tab
        #[arg(long)]
        hash: Option<String>,
    },
    /// Check credentials against the live access list
    Access {
        #[arg(long)]
        email: String,
        #[arg(long)]
        otp: String,
    },
    /// Consolidate every sheet and the assets manifest into the master document
    Sync {
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, default_value = "assets/images")]
        assets: PathBuf,
    },
    /// Write CSVs of local master rows that drifted from the sheets
    Diff {
        #[arg(long, default_value = "diff_outputs")]
        out: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewSection {
    Services,
    Reviews,
    Team,
    Categories,
    Dialogs,
    Hero,
    Logos,
    Portfolio,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!(
        config = ?cli.config,
        nocache = cli.nocache || config.cache.nocache,
        "site-data v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    match cli.command {
        Commands::Sync { output, assets } => {
            let engine = sync_engine(&config)?;
            let report = engine.sync(&master_path(&config, output)?, &assets).await?;
            print_json(&report)?;
        }
        Commands::Diff { out } => {
            let engine = sync_engine(&config)?;
            let report = engine.diff(&master_path(&config, None)?, &out).await?;
            print_json(&report)?;
            if !report.all_match() {
                tracing::warn!("Differences detected, review the generated CSVs");
            }
        }
        command => {
            let store = DataStore::from_config(&config, FetchOptions { nocache: cli.nocache })?;
            store.check_version().await;
            let result = run(&store, &config, command).await;
            store.settle().await;
            result?;
        }
    }

    Ok(())
}

async fn run(store: &DataStore, config: &SiteDataConfig, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Fetch { resource } => print_json(&store.fetch(resource).await)?,
        Commands::CheckVersion => {
            print_json(&serde_json::json!({ "version": store.version_gate().current() }))?
        }
        Commands::Config => print_json(&store.config().await)?,
        Commands::Apply { html, strict } => {
            let page = tokio::fs::read_to_string(&html).await?;
            let mut document = Document::from_html(&page)?;
            let strictness = if strict {
                Strictness::Strict
            } else {
                Strictness::Lenient
            };
            let report = ConfigApplier::new(strictness).apply(&store.config().await, &mut document);
            print_json(&serde_json::json!({ "report": report, "document": document }))?;
        }
        Commands::Cache => print_json(&store.storage().keys())?,
        Commands::View {
            section,
            filter,
            exclude,
            hash,
        } => {
            let options = RenderOptions {
                filter,
                mode: if exclude {
                    FilterMode::Exclude
                } else {
                    FilterMode::Include
                },
                ..RenderOptions::default()
            };
            view(store, section, &options, hash.as_deref()).await?;
        }
        Commands::Access { email, otp } => {
            let gate = AccessGate::new(
                store.fetcher().clone(),
                config.sources.sheets_base_url.clone(),
                store.timeouts().budget(Budget::Interactive),
            );
            let granted = gate.verify(&store.config().await, &email, &otp).await?;
            print_json(&serde_json::json!({ "granted": granted }))?;
        }
        Commands::Sync { .. } | Commands::Diff { .. } => {}
    }
    Ok(())
}

async fn view(
    store: &DataStore,
    section: ViewSection,
    options: &RenderOptions,
    hash: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    match section {
        ViewSection::Services => {
            let mut catalog = ServiceCatalog::build(&store.fetch(ResourceType::Services).await, options);
            if let (site_data::views::Section::Ready(catalog), Some(hash)) = (&mut catalog, hash) {
                catalog.select_hash(hash);
            }
            print_json(&catalog)
        }
        ViewSection::Reviews => print_json(&ReviewCard::build(&store.fetch(ResourceType::Reviews).await)),
        ViewSection::Team => {
            let rows = store.fetch(ResourceType::Team).await;
            let images = store.assets(team::TEAM_FOLDER).await;
            print_json(&ProfileCard::build(&rows, &images))
        }
        ViewSection::Categories => {
            print_json(&HomeCategory::build(&store.fetch(ResourceType::Categories).await))
        }
        ViewSection::Dialogs => print_json(&DialogSchedule::plan(
            &store.fetch(ResourceType::Dialogs).await,
            &HashSet::new(),
        )),
        ViewSection::Hero => print_json(&hero_images(
            &store.assets(site_data::views::imagery::HERO_FOLDER).await,
        )),
        ViewSection::Logos => print_json(&logo_images(
            &store.assets(site_data::views::imagery::LOGOS_FOLDER).await,
        )),
        ViewSection::Portfolio => print_json(&portfolio_images(
            &store.assets(site_data::views::imagery::PORTFOLIO_FOLDER).await,
        )),
    }
}

fn sync_engine(config: &SiteDataConfig) -> Result<SyncEngine, Box<dyn std::error::Error>> {
    Ok(SyncEngine::new(
        SourceFetcher::new(),
        SourceMap::from_config(&config.sources)?,
        config.timeouts.budget(Budget::Background),
    ))
}

/// Local path of the master document, or `override_path` when given.
fn master_path(config: &SiteDataConfig, override_path: Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = override_path {
        return Ok(path);
    }
    let spec = config
        .sources
        .master_data
        .as_deref()
        .ok_or("no master document configured (sources.master_data)")?;
    match SourceLocation::resolve(spec, Path::new(&config.sources.site_root))? {
        SourceLocation::Local(path) => Ok(path),
        SourceLocation::Remote(url) => Err(format!("master document is remote ({}); pass --output", url).into()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
