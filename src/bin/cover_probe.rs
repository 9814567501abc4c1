//! Cover Probe
//!
//! Loads a scenario and reports cover and line of sight between two of its
//! occupants.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tactical_cover::cover::{
    CoverEngine, CoverModifiers, CoverOptions, CoverReport, CoverTier, LosReport,
};
use tactical_cover::measure::measure_distance;
use tactical_cover::scenario::Scenario;

/// Cover Probe - evaluate cover between two occupants of a scenario
#[derive(Parser, Debug)]
#[command(name = "cover_probe")]
#[command(about = "Evaluate cover and line of sight between two occupants")]
struct Args {
    /// Scenario TOML file
    scenario: PathBuf,

    /// Attacking occupant name
    #[arg(long, short = 'a')]
    attacker: String,

    /// Target occupant name; every other occupant when omitted
    #[arg(long, short = 't')]
    target: Option<String>,

    /// Also run the line-of-sight check (no sight means total cover)
    #[arg(long)]
    los: bool,

    /// Include ray traces and sampled shapes
    #[arg(long)]
    debug: bool,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct ProbeResult {
    attacker: String,
    target: String,
    distance: Option<f64>,
    cover: CoverReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    los: Option<LosReport>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(results) => {
            print_results(&args.format, &results);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> tactical_cover::core::Result<Vec<ProbeResult>> {
    let scenario = Scenario::load(&args.scenario)?;
    let ctx = scenario.context();
    let walls = scenario.wall_set();
    let occluders = scenario.occluders(&ctx);
    let engine = CoverEngine::new(&ctx, &walls, &occluders)
        .with_los_check(args.los || scenario.config.los_check);

    let attacker = scenario.occupant(&args.attacker)?;
    let targets = match &args.target {
        Some(name) => vec![scenario.occupant(name)?],
        None => scenario
            .occupants
            .iter()
            .filter(|o| o.id != attacker.id)
            .collect(),
    };

    let options = CoverOptions { debug: args.debug };
    let modifiers = CoverModifiers::default();

    let results = targets
        .into_iter()
        .map(|target| {
            let cover = engine.resolve(attacker, target, &modifiers, options);
            let los = engine
                .los_check
                .then(|| engine.evaluate_los(attacker, target, options));
            ProbeResult {
                attacker: attacker.name.clone(),
                target: target.name.clone(),
                distance: measure_distance(&ctx, attacker, target),
                cover,
                los,
            }
        })
        .collect();

    Ok(results)
}

fn print_results(format: &str, results: &[ProbeResult]) {
    match format {
        "text" => {
            for r in results {
                println!("{} -> {}", r.attacker, r.target);
                if let Some(d) = r.distance {
                    println!("  Distance: {:.1}", d);
                }
                let bonus = match r.cover.bonus {
                    Some(b) => format!("+{}", b),
                    None => "n/a".to_string(),
                };
                println!("  Cover: {} (bonus {})", r.cover.cover, bonus);
                if r.cover.cover != CoverTier::Total {
                    println!("  Rays reachable: {}/{}", r.cover.reachable, r.cover.total_rays);
                }
                if let Some(los) = &r.los {
                    println!("  Line of sight: {}", if los.has_los { "yes" } else { "no" });
                }
            }
        }
        other => {
            if other != "json" {
                eprintln!("Unknown format '{}', defaulting to json", other);
            }
            match serde_json::to_string_pretty(results) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Error: {}", e),
            }
        }
    }
}
