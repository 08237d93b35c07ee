use atar_calc::catalog::{resolve_catalog, validate_catalog, Catalog};
use atar_calc::config::Config;
use atar_calc::output::{self, ReportContext};
use atar_calc::scoring::{compute_aggregate, YearLevel};
use atar_calc::selection::{self, Selection};
use clap::{Args, Parser, Subcommand};
use std::fmt::Display;
use std::path::PathBuf;

const EXIT_SUCCESS: i32 = 0;
const EXIT_SELECTION: i32 = 1;
const EXIT_STORAGE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculate a predicted ATAR (default if no subcommand)
    Calc(CalcArgs),
    /// List subjects in the catalog with their scaling factors
    Subjects {
        /// Only show subjects in this category (exact match)
        #[arg(long)]
        category: Option<String>,
    },
    /// Show subject advice for a year level
    Recommend {
        /// Year level, e.g. "Year 10" or 12
        #[arg(short, long)]
        year_level: Option<YearLevel>,
    },
    /// Saved calculations
    History {
        #[command(subcommand)]
        action: Option<HistoryCommand>,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// List saved calculations, newest first (default)
    List {
        /// Maximum number of calculations to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Show one saved calculation with its subjects
    Show { id: u64 },
    /// Delete a saved calculation
    Delete { id: u64 },
}

#[derive(Args, Debug, Default)]
struct CalcArgs {
    /// Selection sheet (YAML) with subjects, scores and optional student details
    #[arg(short, long)]
    from: Option<PathBuf>,

    /// Subject and raw score as ID=SCORE, e.g. physics=78 (repeatable)
    #[arg(short, long = "subject", value_parser = selection::parse_subject_arg)]
    subjects: Vec<(String, f64)>,

    /// Year level, e.g. "Year 12" (overrides sheet and config)
    #[arg(short, long)]
    year_level: Option<YearLevel>,

    /// Student name for saved calculations and reports
    #[arg(long)]
    student: Option<String>,

    /// Save the calculation to history
    #[arg(long)]
    save: bool,

    /// Write a text report (default file name: ATAR_Report_<name>_<date>.txt)
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    report: Option<Option<PathBuf>>,

    /// Print the top four as tab-separated values
    #[arg(long, conflicts_with = "json")]
    tsv: bool,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
#[command(name = "atar-calc")]
#[command(about = "Predicted WACE ATAR calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging and score breakdowns
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/atar-calc/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Subject catalog (YAML); overrides the config file
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn exit_with(code: i32, message: impl Display) -> ! {
    eprintln!("{}", message);
    std::process::exit(code);
}

fn main() {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Calc(CalcArgs::default()));

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match atar_calc::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => exit_with(EXIT_CONFIG, format!("Config error: {:#}", e)),
    };

    if let Err(errors) = atar_calc::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let level = atar_calc::telemetry::resolve_level(cli.verbose, config.log_level.as_deref());
    if let Err(e) = atar_calc::telemetry::init(&level) {
        exit_with(EXIT_CONFIG, format!("Logging setup failed: {}", e));
    }

    let use_colors = output::should_use_colors();

    match command {
        Commands::Calc(args) => {
            let catalog = load_catalog(cli.catalog, &config);
            run_calc(args, &catalog, &config, cli.verbose, use_colors);
        }
        Commands::Subjects { category } => {
            let catalog = load_catalog(cli.catalog, &config);
            let subjects = match category {
                Some(ref label) => catalog.by_category(label),
                None => catalog.sorted(),
            };
            if let Some(year) = catalog.year {
                tracing::info!(year, "catalog reference year");
            }
            println!("{}", output::format_catalog_table(&subjects, use_colors));
            if subjects.is_empty() {
                eprintln!("Categories: {}", catalog.categories().join(", "));
            }
        }
        Commands::Recommend { year_level } => {
            let year_level = year_level.or(config.year_level).unwrap_or_default();
            println!("{}", output::format_recommendations(year_level, use_colors));
        }
        Commands::History { action } => {
            run_history(
                action.unwrap_or(HistoryCommand::List { limit: 20 }),
                &config,
                use_colors,
            );
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

fn load_catalog(cli_path: Option<PathBuf>, config: &Config) -> Catalog {
    let path = cli_path.or_else(|| config.catalog.clone());
    let catalog = match resolve_catalog(path.as_deref()) {
        Ok(c) => c,
        Err(e) => exit_with(EXIT_CONFIG, format!("Catalog error: {:#}", e)),
    };

    if let Err(errors) = validate_catalog(&catalog) {
        eprintln!("Subject catalog errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    catalog
}

fn history_path(config: &Config) -> PathBuf {
    config
        .history
        .clone()
        .unwrap_or_else(atar_calc::history::get_history_path)
}

fn run_calc(args: CalcArgs, catalog: &Catalog, config: &Config, verbose: bool, use_colors: bool) {
    let sheet = match args.from {
        Some(ref path) => match selection::load_sheet(path) {
            Ok(s) => Some(s),
            Err(e) => exit_with(EXIT_SELECTION, format!("Selection error: {:#}", e)),
        },
        None => None,
    };

    // Sheet subjects first, then --subject pairs, in the order given
    let chosen = match sheet {
        Some(ref s) => s.resolve(catalog),
        None => Ok(Selection::new()),
    }
    .and_then(|mut sel| selection::add_pairs(&mut sel, catalog, &args.subjects).map(|_| sel))
    .unwrap_or_else(|e| exit_with(EXIT_SELECTION, e));

    let year_level = args
        .year_level
        .or(sheet.as_ref().and_then(|s| s.year_level))
        .or(config.year_level)
        .unwrap_or_default();
    let student = args
        .student
        .or_else(|| sheet.and_then(|s| s.student_name));

    tracing::debug!(subjects = chosen.len(), %year_level, "computing aggregate");
    let result = compute_aggregate(chosen.entries());

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => exit_with(EXIT_SELECTION, format!("Failed to serialize result: {}", e)),
        }
    } else if args.tsv {
        println!("{}", output::format_tsv(&result));
    } else {
        println!(
            "{}",
            output::format_result(chosen.entries(), &result, year_level, use_colors)
        );
        if verbose && chosen.is_ready() {
            println!();
            println!("{}", output::format_breakdown(&result, use_colors));
        }
        if !chosen.is_ready() {
            println!();
            println!("{}", output::format_recommendations(year_level, use_colors));
        }
    }

    if (args.save || args.report.is_some()) && !chosen.is_ready() {
        exit_with(
            EXIT_SELECTION,
            format!(
                "Need at least {} subjects to save or export (have {}).",
                atar_calc::scoring::MIN_SUBJECTS,
                chosen.len()
            ),
        );
    }

    if args.save {
        let path = history_path(config);
        let mut state = match atar_calc::history::load_history(&path) {
            Ok(s) => s,
            Err(e) => exit_with(EXIT_STORAGE, format!("History error: {:#}", e)),
        };
        if let Some(id) = state.record(&chosen, &result, year_level, student.as_deref()) {
            if let Err(e) = atar_calc::history::save_history(&path, &state) {
                exit_with(EXIT_STORAGE, format!("Failed to save calculation: {:#}", e));
            }
            eprintln!("Saved calculation #{} to {}", id, path.display());
        }
    }

    if let Some(report_path) = args.report {
        let generated = chrono::Local::now().date_naive();
        let path = report_path.unwrap_or_else(|| {
            PathBuf::from(output::report_file_name(student.as_deref(), generated))
        });
        let rendered = output::render_report(&ReportContext {
            entries: chosen.entries(),
            result: &result,
            year_level,
            student_name: student.as_deref(),
            generated,
        });
        if let Err(e) = output::write_report(&path, &rendered) {
            exit_with(EXIT_STORAGE, format!("Failed to export report: {:#}", e));
        }
        eprintln!("Report written to {}", path.display());
    }
}

fn run_history(action: HistoryCommand, config: &Config, use_colors: bool) {
    let path = history_path(config);
    let mut state = match atar_calc::history::load_history(&path) {
        Ok(s) => s,
        Err(e) => exit_with(EXIT_STORAGE, format!("History error: {:#}", e)),
    };

    match action {
        HistoryCommand::List { limit } => {
            let records = state.latest(limit);
            println!("{}", output::format_history_table(&records, use_colors));
        }
        HistoryCommand::Show { id } => match state.find(id) {
            Some(record) => println!("{}", output::format_record_detail(record, use_colors)),
            None => exit_with(EXIT_SELECTION, format!("No saved calculation #{}", id)),
        },
        HistoryCommand::Delete { id } => {
            if !state.remove(id) {
                exit_with(EXIT_SELECTION, format!("No saved calculation #{}", id));
            }
            if let Err(e) = atar_calc::history::save_history(&path, &state) {
                exit_with(EXIT_STORAGE, format!("Failed to update history: {:#}", e));
            }
            println!("Deleted calculation #{}", id);
        }
    }
}
