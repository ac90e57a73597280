//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - merges flags with the settings file
//! - runs the calculation pipeline
//! - prints reports and writes outputs

use clap::Parser;

use crate::calc::default_reference_cars;
use crate::cli::{CalcArgs, ClearArgs, Command, InitArgs};
use crate::domain::{Adjustments, CarInfo};
use crate::error::AppError;
use crate::io::{
    load_catalog, load_personal, load_settings, save_settings, write_personal_csv, write_references_csv,
    write_results_csv, write_results_json,
};
use crate::personal::PersonalData;

pub mod pipeline;

/// Entry point for the `ffbsens` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Calc(args) => handle_calc(args, OutputMode::PrintOnly),
        Command::Apply(args) => handle_calc(args, OutputMode::Apply),
        Command::Clear(args) => handle_clear(args),
        Command::InitReferences(args) => handle_init_references(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    PrintOnly,
    Apply,
}

fn handle_calc(args: CalcArgs, mode: OutputMode) -> Result<(), AppError> {
    let personal_path = args.paths.personal.clone();
    if mode == OutputMode::Apply && personal_path.is_none() {
        return Err(AppError::new(2, "`apply` needs a personal file (`--personal` or FFBSENS_PERSONAL)."));
    }

    let stored = match &args.paths.settings {
        Some(path) => load_settings(path)?,
        None => Adjustments::default(),
    };
    let adjustments = merge_adjustments(stored, &args);

    let config = pipeline::RunConfig {
        catalog_path: args.paths.catalog.clone(),
        references_path: args.paths.references.clone(),
        personal_path,
        adjustments,
    };
    let mut run = pipeline::run_calculation(&config)?;

    print!("{}", crate::report::format_run_summary(&run));
    if !args.no_table {
        print!("{}", crate::report::format_results_table(&run.rows));
    }

    if let Some(path) = &args.export {
        write_results_csv(path, &run.rows)?;
    }
    if let Some(path) = &args.export_json {
        write_results_json(path, &run.rows, &run.adjustments)?;
    }
    if args.save_settings {
        if let Some(path) = &args.paths.settings {
            save_settings(path, &run.adjustments)?;
        }
    }

    if mode == OutputMode::Apply {
        if let Some(path) = &config.personal_path {
            run.personal.apply_results(&run.results);
            write_personal_csv(path, &run.personal)?;
            println!("Stored sensitivities for {} car(s) in '{}'.", run.results.len(), path.display());
        }
    }

    Ok(())
}

/// Flags win over the stored settings.
fn merge_adjustments(stored: Adjustments, args: &CalcArgs) -> Adjustments {
    let target_car_id = if args.all_cars {
        None
    } else {
        args.target.or(stored.target_car_id)
    };
    Adjustments {
        weight_ratio_percent: args.weight_ratio.unwrap_or(stored.weight_ratio_percent),
        fwd_percent: args.fwd.unwrap_or(stored.fwd_percent),
        rwd_percent: args.rwd.unwrap_or(stored.rwd_percent),
        awd_percent: args.awd.unwrap_or(stored.awd_percent),
        target_car_id,
    }
}

fn handle_clear(args: ClearArgs) -> Result<(), AppError> {
    let ingested = load_personal(&args.personal)?;
    if !ingested.row_errors.is_empty() {
        log::warn!("dropping {} unreadable personal row(s)", ingested.row_errors.len());
    }
    let mut personal = PersonalData::from_cars(ingested.items);
    personal.clear_sensitivities();
    write_personal_csv(&args.personal, &personal)?;
    println!("Cleared sensitivities for {} car(s).", personal.len());
    Ok(())
}

fn handle_init_references(args: InitArgs) -> Result<(), AppError> {
    if !args.force && args.output.exists() {
        return Err(AppError::new(
            2,
            format!("'{}' already exists (use --force to overwrite).", args.output.display()),
        ));
    }

    let catalog = load_catalog(&args.catalog)?;
    let infos: Vec<CarInfo> = catalog.items.iter().map(|c| c.info).collect();
    let templates = default_reference_cars(&infos);
    write_references_csv(&args.output, &templates)?;
    println!(
        "Wrote {} reference template(s) to '{}'; fill in the sensitivities before running `calc`.",
        templates.len(),
        args.output.display()
    );
    Ok(())
}

/// Rewrite argv so bare flags run `calc`.
///
/// Rules:
/// - `ffbsens --catalog ...`          -> `ffbsens calc --catalog ...`
/// - `ffbsens`, `--help`, `--version` -> unchanged
/// - explicit subcommands             -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "calc".to_string());
    }
    argv
}
