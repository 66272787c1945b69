//! CLI entry point for the trip insights dashboard.
//!
//! Provides subcommands for type-ahead suggestions, a KPI and chart-data
//! report for a filter state, and CSV export of the aggregate views.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use trip_insights::{
    config::{AppConfig, parse_bins},
    dashboard::Dashboard,
    filter::FilterSelection,
    loader::DatasetHandle,
    output::{export_views, format_report, print_pretty, render_json},
    suggest::SuggestionIndex,
};

#[derive(Parser)]
#[command(name = "trip_insights")]
#[command(about = "Explore trip records by month, day and weekday", long_about = None)]
struct Cli {
    /// CSV dataset to load (overrides TRIP_DATA_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Number of trip distribution buckets (overrides HISTOGRAM_BINS)
    #[arg(long, global = true, value_parser = parse_bins)]
    bins: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the candidates matching a partial query
    Suggest {
        #[arg(value_enum)]
        field: Field,

        /// Partial text, matched case-insensitively
        query: String,
    },
    /// Print KPIs and chart data for a filter state
    Report {
        #[command(flatten)]
        filters: FilterArgs,

        /// Emit the full snapshot as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write month, weekday and weekday x month totals as CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// Directory to write CSV files into
        #[arg(short, long, default_value = "exports")]
        output_dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Field {
    Month,
    Day,
    Weekday,
}

/// Partial queries; each is narrowed and its first candidate confirmed.
#[derive(Args)]
struct FilterArgs {
    /// Month query, e.g. "feb" or "2"
    #[arg(short, long)]
    month: Option<String>,

    /// Day-of-month query, e.g. "14"
    #[arg(short, long)]
    day: Option<String>,

    /// Weekday query, e.g. "sat"
    #[arg(short, long)]
    weekday: Option<String>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    if let Some(bins) = cli.bins {
        config.histogram_bins = bins;
    }

    let _file_guard = init_logging(&config.log_file_path)?;

    let handle = DatasetHandle::new(&config.data_path);
    let dataset = match handle.get() {
        Ok(dataset) => dataset,
        Err(e) => {
            error!(error = %e, kind = ?e.kind(), "Failed to load dataset");
            return Err(e.into());
        }
    };
    let dashboard = Dashboard::new(dataset).with_histogram_bins(config.histogram_bins);

    match cli.command {
        Commands::Suggest { field, query } => {
            let index = dashboard.suggestions();
            let candidates = match field {
                Field::Month => index.months(&query),
                Field::Day => index.days(&query),
                Field::Weekday => index.weekdays(&query),
            };

            info!(query = %query, matches = candidates.len(), "Suggestions computed");
            for candidate in candidates {
                println!("{candidate}");
            }
        }
        Commands::Report { filters, json } => {
            let selection = confirm_selection(dashboard.suggestions(), &filters);
            let snapshot = dashboard.render(&selection);
            print_pretty(&snapshot);

            if json {
                println!("{}", render_json(&snapshot)?);
            } else {
                print!("{}", format_report(&snapshot));
            }
        }
        Commands::Export {
            filters,
            output_dir,
        } => {
            let selection = confirm_selection(dashboard.suggestions(), &filters);
            let snapshot = dashboard.render(&selection);
            if snapshot.fell_back {
                warn!("No data matches filters, exporting the full dataset");
            }

            for path in export_views(&output_dir, &snapshot.views)? {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_logging(log_file_path: &Path) -> Result<WorkerGuard> {
    let log_dir = log_file_path.parent().unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("trip_insights.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

/// Turns raw queries into confirmed filter values drawn from the suggestion domains.
///
/// A query with no candidates leaves its component unset.
fn confirm_selection(index: &SuggestionIndex, filters: &FilterArgs) -> FilterSelection {
    let mut selection = FilterSelection::default();

    if let Some(query) = filters.month.as_deref() {
        selection.month = index.pick_month(query);
        if selection.month.is_none() {
            warn!(query, "No month matches query, ignoring");
        }
    }
    if let Some(query) = filters.day.as_deref() {
        selection.day = index.pick_day(query);
        if selection.day.is_none() {
            warn!(query, "No day matches query, ignoring");
        }
    }
    if let Some(query) = filters.weekday.as_deref() {
        selection.weekday = index.pick_weekday(query);
        if selection.weekday.is_none() {
            warn!(query, "No weekday matches query, ignoring");
        }
    }

    info!(?selection, "Filter selection confirmed");
    selection
}
