#![deny(warnings)]

//! Headless CLI: builds a population, runs the UBI simulation, and prints a
//! poverty-rate summary. Optionally writes the full monthly series as JSON.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;
use sim_core::{validate_config, validate_policy, Policy, SimConfig};
use sim_runtime::{run_months, Environment};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// Optional scenario file overriding the default policy and run shape.
#[derive(Debug, Default, Deserialize)]
struct Scenario {
    #[serde(default)]
    policy: Option<Policy>,
    #[serde(default)]
    years: Option<u32>,
    #[serde(default)]
    n_households: Option<usize>,
    #[serde(default)]
    persons_per_household: Option<usize>,
}

struct Args {
    years: u32,
    steps_per_year: u32,
    seed: u64,
    n_households: Option<usize>,
    persons_per_household: Option<usize>,
    scenario: Option<PathBuf>,
    out: Option<PathBuf>,
}

fn parse_args() -> Args {
    let mut args = Args {
        years: 10,
        steps_per_year: 12,
        seed: 42,
        n_households: None,
        persons_per_household: None,
        scenario: None,
        out: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--years" => {
                if let Some(v) = it.next().and_then(|s| s.parse().ok()) {
                    args.years = v;
                }
            }
            "--steps-per-year" => {
                if let Some(v) = it.next().and_then(|s| s.parse().ok()) {
                    args.steps_per_year = v;
                }
            }
            "--seed" => {
                if let Some(v) = it.next().and_then(|s| s.parse().ok()) {
                    args.seed = v;
                }
            }
            "--households" => {
                args.n_households = it.next().and_then(|s| s.parse().ok());
            }
            "--persons-per-household" => {
                args.persons_per_household = it.next().and_then(|s| s.parse().ok());
            }
            "--scenario" => {
                args.scenario = it.next().map(PathBuf::from);
            }
            "--out" => {
                args.out = it.next().map(PathBuf::from);
            }
            _ => {}
        }
    }
    args
}

fn load_scenario(path: &PathBuf) -> Result<Scenario> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading scenario file {}", path.display()))?;
    let scenario = serde_yaml::from_str(&text)
        .with_context(|| format!("parsing scenario file {}", path.display()))?;
    Ok(scenario)
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args();
    let scenario = match &args.scenario {
        Some(path) => load_scenario(path)?,
        None => Scenario::default(),
    };

    let policy = scenario.policy.unwrap_or_default();
    let defaults = SimConfig::default();
    let config = SimConfig {
        n_households: args
            .n_households
            .or(scenario.n_households)
            .unwrap_or(defaults.n_households),
        persons_per_household: args
            .persons_per_household
            .or(scenario.persons_per_household)
            .unwrap_or(defaults.persons_per_household),
        rng_seed: args.seed,
    };
    let years = scenario.years.unwrap_or(args.years);
    let months = years * args.steps_per_year;

    validate_policy(&policy)?;
    validate_config(&config)?;
    info!(years, months, seed = config.rng_seed, "starting UBI simulation");

    let mut env = Environment::new(policy, &config);
    let poverty_rates = run_months(&mut env, months);

    let final_rate = poverty_rates.last().copied().unwrap_or(0.0);
    let mean_hours =
        env.persons.iter().map(|p| p.work_hours).sum::<f64>() / env.persons.len() as f64;
    let mean_saving = env.persons.iter().map(|p| p.saving).sum::<f64>() / env.persons.len() as f64;

    println!(
        "Run OK | households: {} | persons: {} | months: {}",
        env.households.len(),
        env.persons.len(),
        months
    );
    println!(
        "KPI | final poverty rate: {:.2}% | mean hours: {:.1} | mean saving: {:.0}",
        final_rate * 100.0,
        mean_hours,
        mean_saving
    );

    if let Some(out) = &args.out {
        let json = serde_json::to_string_pretty(&poverty_rates)?;
        fs::write(out, json).with_context(|| format!("writing series to {}", out.display()))?;
        println!("Series written to {}", out.display());
    }

    Ok(())
}
