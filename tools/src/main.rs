//! mktsim: headless runner for the marketing dataset generator.
//!
//! Usage:
//!   mktsim generate --seed 42 --out data/out --data-dir data
//!   mktsim load --in data/out --db marketing.db --clear
//!
//! `load` reads the database path from --db, falling back to
//! MKTSIM_DATABASE_URL.

use anyhow::{bail, Context, Result};
use mktsim_core::{
    config::{GeneratorConfig, LoaderConfig},
    interchange,
    loader::{ConfirmGate, LoadReport, Loader, StepStatus},
    pipeline::Pipeline,
    store::SimStore,
    summary::DatasetSummary,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Reads a yes/no answer from stdin.
struct StdinConfirm;

impl ConfirmGate for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        print!("WARNING: {prompt} (yes/no): ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => answer.trim().eq_ignore_ascii_case("yes"),
            Err(_) => false,
        }
    }
}

/// Confirms without asking (--yes).
struct PreConfirmed;

impl ConfirmGate for PreConfirmed {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("generate") => run_generate(&args),
        Some("load") => run_load(&args),
        Some(other) => bail!("unknown command '{other}'; expected 'generate' or 'load'"),
        None => bail!("usage: mktsim <generate|load> [options]"),
    }
}

fn run_generate(args: &[String]) -> Result<()> {
    let data_dir = arg_str(args, "--data-dir").unwrap_or("./data");
    let out_dir = arg_str(args, "--out").unwrap_or("./data/out");

    let mut config = GeneratorConfig::load(data_dir)
        .with_context(|| format!("loading generator config from {data_dir}"))?;
    if let Some(seed) = parse_opt::<u64>(args, "--seed") {
        config.seed = seed;
    }

    println!("mktsim: generate");
    println!("  seed:      {}", config.seed);
    println!("  horizon:   {} .. {}", config.horizon.start, config.horizon.end);
    println!("  campaigns: {}", config.num_campaigns);
    println!("  out:       {out_dir}");
    println!();

    let dataset = Pipeline::generate(config).context("generating dataset")?;
    interchange::write_dataset(Path::new(out_dir), &dataset)
        .with_context(|| format!("writing interchange files to {out_dir}"))?;

    print_summary(&dataset.summary());
    Ok(())
}

fn run_load(args: &[String]) -> Result<()> {
    let in_dir = arg_str(args, "--in").unwrap_or("./data/out");
    let clear = args.iter().any(|a| a == "--clear");
    let assume_yes = args.iter().any(|a| a == "--yes");

    let loader_config = match arg_str(args, "--db") {
        Some(db) => LoaderConfig::new(db),
        None => LoaderConfig::from_env()?,
    };

    println!("mktsim: load");
    println!("  in:    {in_dir}");
    println!("  db:    {}", loader_config.database_url);
    println!("  clear: {clear}");
    println!();

    let dataset = interchange::read_dataset(Path::new(in_dir))
        .with_context(|| format!("reading interchange files from {in_dir}"))?;

    let store = SimStore::open(&loader_config.database_url)
        .with_context(|| format!("opening {}", loader_config.database_url))?;
    store.migrate()?;

    if clear {
        log::warn!("existing data in {} will be cleared before import", loader_config.database_url);
    }
    let loader = Loader::new(loader_config.batch_sizes).clear_first(clear);
    let report = if assume_yes {
        loader.load(&dataset, &store, &mut PreConfirmed)
    } else {
        loader.load(&dataset, &store, &mut StdinConfirm)
    };

    print_report(&report);
    report.into_result().context("import stopped; some data may have been imported")?;
    Ok(())
}

fn print_summary(summary: &DatasetSummary) {
    println!("=== DATASET SUMMARY ===");
    println!("  campaigns:          {}", summary.campaigns);
    println!("  daily performance:  {}", summary.daily_performance);
    println!("  customers:          {}", summary.customers);
    println!("  transactions:       {}", summary.transactions);
    println!("  a/b test rows:      {}", summary.ab_tests);
    println!();
    println!("=== OVERALL METRICS ===");
    println!("  total spend:   ${:.2}", summary.total_spend);
    println!("  total revenue: ${:.2}", summary.total_revenue);
    println!("  overall ROAS:  {:.2}x", summary.overall_roas);
}

fn print_report(report: &LoadReport) {
    if report.cancelled {
        println!("Import cancelled.");
        return;
    }
    println!("=== LOAD REPORT ===");
    for step in &report.steps {
        match &step.status {
            StepStatus::Done { rows, batches } => {
                println!("  {:<18} ok      {rows} rows in {batches} batches", step.step.to_string())
            }
            StepStatus::Failed { rows_written, error } => println!(
                "  {:<18} FAILED  after {rows_written} rows: {error}",
                step.step.to_string()
            ),
            StepStatus::NotAttempted => {
                println!("  {:<18} not attempted", step.step.to_string())
            }
        }
    }
}

fn arg_str<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_opt<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    arg_str(args, flag).and_then(|v| v.parse().ok())
}
