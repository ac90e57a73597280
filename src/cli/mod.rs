//! Command-line parsing for the FFB sensitivity calculator.
//!
//! Argument parsing and command dispatch stay separate from the calculation
//! code. File paths may also come from environment variables (or `.env`).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ffbsens", version, about = "Force-feedback sensitivity calculator for rally cars")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute sensitivities from the reference cars and print them.
    Calc(CalcArgs),
    /// Compute sensitivities and store them in the personal file.
    Apply(CalcArgs),
    /// Remove every stored sensitivity from the personal file.
    Clear(ClearArgs),
    /// Write a reference CSV template spanning the catalog.
    InitReferences(InitArgs),
}

/// Input files shared by the calculating commands.
#[derive(Debug, Args, Clone)]
pub struct InputPaths {
    /// Car catalog CSV (`id,name,drivetrain,rotation,weight_kg`).
    #[arg(long, env = "FFBSENS_CATALOG", value_name = "CSV")]
    pub catalog: PathBuf,

    /// Reference cars CSV (`drivetrain,rotation,weight_kg,gravel,tarmac,snow`).
    #[arg(long, env = "FFBSENS_REFERENCES", value_name = "CSV")]
    pub references: PathBuf,

    /// Personal CSV (`car_id,gravel,tarmac,snow,rotation`); supplies rotation overrides.
    #[arg(long, env = "FFBSENS_PERSONAL", value_name = "CSV")]
    pub personal: Option<PathBuf>,

    /// Adjustments JSON; flags below override its values.
    #[arg(long, env = "FFBSENS_SETTINGS", value_name = "JSON")]
    pub settings: Option<PathBuf>,
}

/// Options for `calc` and `apply`.
#[derive(Debug, Args, Clone)]
pub struct CalcArgs {
    #[command(flatten)]
    pub paths: InputPaths,

    /// Weight ratio in percent: 0 = rotation only, 100 = weight only.
    #[arg(short = 'w', long, value_name = "PERCENT")]
    pub weight_ratio: Option<f64>,

    /// FWD factor in percent.
    #[arg(long, value_name = "PERCENT")]
    pub fwd: Option<f64>,

    /// RWD factor in percent.
    #[arg(long, value_name = "PERCENT")]
    pub rwd: Option<f64>,

    /// AWD factor in percent.
    #[arg(long, value_name = "PERCENT")]
    pub awd: Option<f64>,

    /// Only compute the car with this id.
    #[arg(short = 't', long, value_name = "ID", conflicts_with = "all_cars")]
    pub target: Option<u32>,

    /// Compute every car, even if the settings file names a target car.
    #[arg(long)]
    pub all_cars: bool,

    /// Write the effective adjustments back to the settings file.
    #[arg(long, requires = "settings")]
    pub save_settings: bool,

    /// Do not print the per-car table.
    #[arg(long)]
    pub no_table: bool,

    /// Export per-car results to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export per-car results (plus adjustments) to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

/// Options for `clear`.
#[derive(Debug, Args)]
pub struct ClearArgs {
    /// Personal CSV to clear.
    #[arg(long, env = "FFBSENS_PERSONAL", value_name = "CSV")]
    pub personal: PathBuf,
}

/// Options for `init-references`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Car catalog CSV.
    #[arg(long, env = "FFBSENS_CATALOG", value_name = "CSV")]
    pub catalog: PathBuf,

    /// Where to write the template.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub output: PathBuf,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}
