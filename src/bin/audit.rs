//! Placement audit CLI.
//!
//! Runs many automatic placements in parallel and writes one JSON record per
//! run as JSONL, with a summary on stderr.
//!
//! Usage:
//!   cargo run --release --bin audit -- [OPTIONS]
//!
//! Options:
//!   --games N       Number of runs (default: 100)
//!   --threads N     Number of parallel threads (default: 4)
//!   --mountains N   Mountains requested per side (default: 6)
//!   --seed N        Base random seed, 0 for entropy (default: 0)
//!   --config FILE   Game configuration JSON
//!   --output FILE   Output file path (default: stdout)
//!   --quiet         Suppress progress and summary output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process;
use std::str::FromStr;
use std::time::Instant;

use tracing_subscriber::EnvFilter;

use cyvasse::audit::{self, AuditConfig};
use cyvasse::config::GameConfig;

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    print_usage();
    process::exit(1);
}

fn value<T: FromStr>(args: &[String], i: usize, flag: &str) -> T {
    args.get(i)
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| fail(&format!("invalid {} value", flag)))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let mut config = AuditConfig::default();
    let mut mountains: Option<u32> = None;
    let mut output_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                i += 1;
                config.games = value(&args, i, "--games");
            }
            "--threads" => {
                i += 1;
                config.threads = value(&args, i, "--threads");
            }
            "--mountains" => {
                i += 1;
                mountains = Some(value(&args, i, "--mountains"));
            }
            "--seed" => {
                i += 1;
                config.seed = value(&args, i, "--seed");
            }
            "--config" => {
                i += 1;
                let path: String = value(&args, i, "--config");
                config.game = GameConfig::load(&path)
                    .unwrap_or_else(|e| fail(&format!("failed to load {}: {}", path, e)));
            }
            "--output" => {
                i += 1;
                output_path = Some(value(&args, i, "--output"));
            }
            "--quiet" => {
                config.quiet = true;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => fail(&format!("Unknown argument: {}", other)),
        }
        i += 1;
    }
    config.mountains = mountains.unwrap_or(config.game.mountains_per_side);

    if !config.quiet {
        eprintln!(
            "Audit: {} runs, {} mountains/side, board {}, {} threads",
            config.games, config.mountains, config.game.board_size, config.threads
        );
    }

    let start = Instant::now();
    let records = match audit::run_audit(&config) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("audit failed: {}", e);
            process::exit(1);
        }
    };
    let elapsed = start.elapsed();

    if !config.quiet {
        eprintln!(
            "Completed {} runs in {:.2}s",
            records.len(),
            elapsed.as_secs_f64()
        );
        audit::print_summary(&records);
    }

    let written = match &output_path {
        Some(path) => File::create(path).and_then(|file| audit::write_jsonl(&records, &mut BufWriter::new(file))),
        None => audit::write_jsonl(&records, &mut BufWriter::new(io::stdout().lock())),
    };
    if let Err(e) = written {
        eprintln!("failed to write output: {}", e);
        process::exit(1);
    }
    if let (Some(path), false) = (&output_path, config.quiet) {
        eprintln!("Wrote {} runs to {}", records.len(), path);
    }
}

fn print_usage() {
    eprintln!("Usage: audit [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N        Number of runs (default: 100)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --mountains N    Mountains requested per side (default: 6)");
    eprintln!("  --seed N         Base random seed, 0 for entropy (default: 0)");
    eprintln!("  --config FILE    Game configuration JSON");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress progress and summary output");
    eprintln!("  --help           Show this help");
}
