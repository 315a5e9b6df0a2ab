use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use poprank::io::debug_log::write_rank_path_log;
use poprank::{EngineConfig, Interpolation, ModelKind, PopRank, Sex};

#[derive(Parser)]
#[command(name = "poprank")]
#[command(about = "Population rank by birthdate, region and sex", long_about = None)]
struct Cli {
    /// WPP single-age CSV (overrides POPRANK_CONFIG / POPRANK_DATA_CSV)
    #[arg(long, value_name = "CSV")]
    data: Option<PathBuf>,

    /// Surface interpolation: spline (default) or bilinear
    #[arg(long)]
    interpolation: Option<Interpolation>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// How many people in the region are younger than someone born on DOB, on DATE
    Rank {
        #[arg(long)]
        sex: String,
        #[arg(long)]
        region: String,
        #[arg(long)]
        dob: NaiveDate,
        #[arg(long)]
        date: NaiveDate,
    },
    /// When someone born on DOB reaches RANK
    DateForRank {
        #[arg(long)]
        sex: String,
        #[arg(long)]
        region: String,
        #[arg(long)]
        dob: NaiveDate,
        #[arg(long)]
        rank: i64,
    },
    /// Raw male/female/total counts for one age
    Count {
        #[arg(long)]
        region: String,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        year: Option<i32>,
    },
    /// When the cohort born on or after DOB_FROM reaches TARGET persons
    CohortDate {
        #[arg(long)]
        region: String,
        #[arg(long)]
        sex: Sex,
        #[arg(long)]
        dob_from: NaiveDate,
        #[arg(long)]
        target: f64,
        /// annual, daily or surface
        #[arg(long, default_value = "annual")]
        model: ModelKind,
    },
    /// Ranks every STEP_YEARS from birth
    Path {
        #[arg(long)]
        sex: String,
        #[arg(long)]
        region: String,
        #[arg(long)]
        dob: NaiveDate,
        #[arg(long, default_value_t = 1)]
        step_years: u32,
        /// Also write a plain-text log of the path into this directory
        #[arg(long, value_name = "DIR")]
        log_dir: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut cfg = match &cli.data {
        Some(path) => EngineConfig { data_csv: Some(path.clone()), ..EngineConfig::default() },
        None => EngineConfig::from_env()?,
    };
    if let Some(interpolation) = cli.interpolation {
        cfg.interpolation = interpolation;
    }

    let source = cfg.load_source().context("loading population data")?;
    let engine = PopRank::new(source, cfg.interpolation);

    let out = match cli.command {
        Commands::Rank { sex, region, dob, date } => {
            let rank = engine.rank(&sex, &region, dob, date)?;
            json!({ "sex": sex, "region": region, "dob": dob, "date": date, "rank": rank })
        }
        Commands::DateForRank { sex, region, dob, rank } => {
            let found = engine.date_for_rank(&sex, &region, dob, rank)?;
            json!({
                "sex": sex,
                "region": region,
                "dob": dob,
                "rank": rank,
                "date": found.map(|r| r.date),
                "exact_age_days": found.map(|r| r.exact_age_days),
            })
        }
        Commands::Count { region, age, year } => {
            let counts = engine.population_count(&region, age, year)?;
            json!({ "region": region, "age": age, "counts": counts })
        }
        Commands::CohortDate { region, sex, dob_from, target, model } => {
            let date = engine.date_for_cohort_count(&region, sex, model, dob_from, target)?;
            json!({ "region": region, "sex": sex, "dob_from": dob_from, "target": target, "date": date })
        }
        Commands::Path { sex, region, dob, step_years, log_dir } => {
            let points = engine.rank_path(&sex, &region, dob, step_years)?;
            if let Some(dir) = log_dir {
                let parsed: Sex = sex.parse()?;
                let run_id = format!("{}_{}_{}", region.replace(' ', "_"), parsed, dob);
                let path = write_rank_path_log(&dir, &run_id, &region, parsed, dob, &points)?;
                tracing::info!(path = %path.display(), "wrote rank path log");
            }
            json!({ "sex": sex, "region": region, "dob": dob, "points": points })
        }
    };

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
