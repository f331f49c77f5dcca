//! Gatehunt Headless Gate Simulator
//!
//! Resolves seeded gates without any collaborator outside the process and
//! prints balance figures for one grade and party shape.
//!
//! Usage:
//!   cargo run --bin simulator -- [OPTIONS]
//!
//! Options:
//!   --grade G       Gate grade E..SSS (default: E)
//!   --party N       Party size, 1 = solo (default: 1)
//!   --runs N        Number of gates with incrementing seeds (default: 500)
//!   --seed N        Base RNG seed (default: 42)
//!   --level N       Entrant level (default: grade minimum)
//!   --job NAME      Job of every entrant (default: Fighter)
//!   --healer        Last party slot is a Healer
//!   --config FILE   Engine rules as JSON
//!   --json          Print the report as JSON

use gatehunt::character::job::JobClass;
use gatehunt::core::config::EngineConfig;
use gatehunt::gate::grade::GateGrade;
use gatehunt::simulator::{run_simulation, SimConfig};
use tracing_subscriber::EnvFilter;

// ── CLI Configuration ────────────────────────────────────────────────

struct CliArgs {
    sim: SimConfig,
    json: bool,
}

fn next_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("{flag} requires a number, got '{value}'"))
}

fn parse_args(args: &[String]) -> Result<Option<CliArgs>, String> {
    let mut sim = SimConfig {
        seed: Some(42),
        ..Default::default()
    };
    let mut json = false;
    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--grade" => {
                i += 1;
                sim.grade = next_value(args, i, flag)?
                    .parse::<GateGrade>()
                    .map_err(|e| e.to_string())?;
            }
            "--party" => {
                i += 1;
                sim.party_size = parse_number(next_value(args, i, flag)?, flag)?;
            }
            "--runs" => {
                i += 1;
                sim.runs = parse_number(next_value(args, i, flag)?, flag)?;
            }
            "--seed" => {
                i += 1;
                sim.seed = Some(parse_number(next_value(args, i, flag)?, flag)?);
            }
            "--level" => {
                i += 1;
                sim.level = Some(parse_number(next_value(args, i, flag)?, flag)?);
            }
            "--job" => {
                i += 1;
                sim.job = next_value(args, i, flag)?.parse::<JobClass>()?;
            }
            "--healer" => sim.include_healer = true,
            "--config" => {
                i += 1;
                let path = next_value(args, i, flag)?;
                let text = std::fs::read_to_string(path)
                    .map_err(|e| format!("cannot read {path}: {e}"))?;
                sim.engine = EngineConfig::from_json_str(&text).map_err(|e| e.to_string())?;
            }
            "--json" => json = true,
            "--help" | "-h" => return Ok(None),
            other => return Err(format!("Unknown argument: {other}")),
        }
        i += 1;
    }
    Ok(Some(CliArgs { sim, json }))
}

fn print_usage() {
    eprintln!(
        "Gatehunt Headless Gate Simulator\n\
         \n\
         Usage: simulator [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --grade G       Gate grade E..SSS (default: E)\n\
         \x20 --party N       Party size, 1 = solo (default: 1)\n\
         \x20 --runs N        Number of gates with incrementing seeds (default: 500)\n\
         \x20 --seed N        Base RNG seed (default: 42)\n\
         \x20 --level N       Entrant level (default: grade minimum)\n\
         \x20 --job NAME      Job of every entrant (default: Fighter)\n\
         \x20 --healer        Last party slot is a Healer\n\
         \x20 --config FILE   Engine rules as JSON\n\
         \x20 --json          Print the report as JSON\n\
         \x20 --help, -h      Show this help"
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli = match parse_args(&args) {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            print_usage();
            return;
        }
        Err(message) => {
            eprintln!("{message}");
            print_usage();
            std::process::exit(1);
        }
    };

    let report = match run_simulation(&cli.sim) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Simulation failed: {e}");
            std::process::exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Cannot encode report: {e}");
                std::process::exit(1);
            }
        }
    } else {
        println!(
            "Grade {} | party {} | level {} | {}{}",
            cli.sim.grade,
            cli.sim.party_size,
            cli.sim.entrant_level(),
            cli.sim.job.name(),
            if cli.sim.include_healer { " + Healer" } else { "" }
        );
        print!("{}", report.to_text());
    }
}
