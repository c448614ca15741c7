// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

// Use library instead of local modules
use trophee_palmares::view::EMPTY_RESULTS;
use trophee_palmares::{
    convert_files, places_for_year, ranked_for_selection, write_snapshot, years_present, Config,
    Snapshot, ViewState,
};

#[derive(Parser, Debug)]
#[command(name = "palmares", version, about = "Trophée results archive viewer")]
struct Cli {
    /// Snapshot file (overrides config and PALMARES_DATA)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert the results workbook (or CSV sheet exports) into the snapshot file
    Convert {
        /// Workbooks (.xlsx, .xls, .ods) or CSV files, concatenated in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(short, long, default_value = "data.json")]
        output: PathBuf,
    },
    /// List years, most recent first
    Years,
    /// List the places of a year
    Places { year: i64 },
    /// Print the ranked table of a year and place
    ///
    /// Use "National Finals" as the place for the finals table.
    Results { year: i64, place: String },
    /// Browse interactively (default)
    Tui,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }

    match cli.command.unwrap_or(Command::Tui) {
        Command::Convert { inputs, output } => run_convert(&inputs, &output),
        Command::Years => {
            let snapshot = load(&config)?;
            for year in years_present(snapshot.entries()) {
                println!("{}", year);
            }
            Ok(())
        }
        Command::Places { year } => {
            let snapshot = load(&config)?;
            for place in places_for_year(snapshot.entries(), year) {
                println!("{}", place);
            }
            Ok(())
        }
        Command::Results { year, place } => run_results(&config, year, &place),
        Command::Tui => run_ui_mode(&config),
    }
}

fn load(config: &Config) -> Result<Snapshot> {
    Snapshot::load(&config.data_path).with_context(|| {
        format!(
            "Cannot load {:?}. Run: palmares convert <palmares.xlsx> first.",
            config.data_path
        )
    })
}

fn run_convert(inputs: &[PathBuf], output: &Path) -> Result<()> {
    let (entries, report) = convert_files(inputs)?;
    write_snapshot(output, &entries)?;

    info!(
        rows = report.rows_read,
        kept = report.kept,
        dropped = report.dropped,
        finals = report.finals,
        "conversion done"
    );
    println!("✅ {:?} written with {} entries", output, entries.len());
    Ok(())
}

fn run_results(config: &Config, year: i64, place: &str) -> Result<()> {
    let snapshot = load(config)?;
    let state = ViewState::years().select_year(year).select_place(place);
    let groups = ranked_for_selection(snapshot.entries(), &state.selection);

    println!("{}", state.breadcrumb());

    if groups.is_empty() {
        println!("\n{}", EMPTY_RESULTS);
        return Ok(());
    }

    for group in groups {
        println!("\n{}", group.label);
        println!("{}", "─".repeat(group.label.chars().count()));
        for row in group.rows {
            println!("  {:<30} {:<30} {}", row.candidate, row.teacher, row.distinction);
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    let snapshot = load(config)?;
    info!(entries = snapshot.len(), "starting UI");

    let mut app = ui::App::new(snapshot);
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the web UI: cargo run --bin palmares-server --features server");
    std::process::exit(1);
}
