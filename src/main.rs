use std::env;
use std::time::Instant;

use montecarlo_pi::{
    estimate_pi_async, estimate_pi_with, preview_points, AggregateEstimate, CollectMode,
    EstimatorConfig, SourceKind,
};
use montecarlo_pi::preview::DEFAULT_PREVIEW_POINTS;

const SEED_VAR: &str = "MONTECARLO_SEED";

fn print_usage(program: &str) {
    eprintln!("Usage: {} <mode> [samples] [workers] [seed]", program);
    eprintln!("  mode: 'threads', 'locked', 'async', 'lcg' or 'preview'");
    eprintln!("  samples: optional, defaults to 10000000 (points for 'preview', defaults to 1000)");
    eprintln!("  workers: optional, defaults to the number of available cores");
    eprintln!("  seed: optional, defaults to ${} or 0", SEED_VAR);
}

fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_arg<T: std::str::FromStr>(args: &[String], index: usize, name: &str) -> Option<T> {
    let raw = args.get(index)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            eprintln!("Invalid {}: {}", name, raw);
            std::process::exit(1);
        }
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn print_estimate(title: &str, estimate: &AggregateEstimate) {
    println!("{}", title);
    println!("Total samples: {}", estimate.total_samples);
    println!("Points inside circle: {}", estimate.total_inside);
    println!("Pi estimate: {:.6}", estimate.pi_estimate);
    println!("Error: {:.6}", estimate.error());
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    setup_logging();

    let mode = args[1].as_str();
    let seed: u64 = parse_arg(&args, 4, "seed")
        .or_else(|| env::var(SEED_VAR).ok().and_then(|s| s.parse().ok()))
        .unwrap_or(0);

    if mode == "preview" {
        let count = parse_arg(&args, 2, "points").unwrap_or(DEFAULT_PREVIEW_POINTS);
        println!("x,y,inside");
        for p in preview_points(count, seed) {
            println!("{},{},{}", p.x, p.y, p.inside);
        }
        return;
    }

    let total_samples: u64 = parse_arg(&args, 2, "samples").unwrap_or(10_000_000);
    let worker_count: usize = parse_arg(&args, 3, "workers").unwrap_or_else(default_workers);
    let config = EstimatorConfig::new(total_samples, worker_count).with_seed(seed);

    let start = Instant::now();
    let (title, outcome) = match mode {
        "threads" => ("Monte Carlo Pi Estimation", estimate_pi_with(&config)),
        "locked" => (
            "Monte Carlo Pi Estimation (Locked)",
            estimate_pi_with(&config.clone().with_collect(CollectMode::Locked)),
        ),
        "lcg" => (
            "Monte Carlo Pi Estimation (LCG)",
            estimate_pi_with(&config.clone().with_source(SourceKind::Lcg)),
        ),
        "async" => {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(e) => {
                    eprintln!("Failed to start tokio runtime: {}", e);
                    std::process::exit(1);
                }
            };
            (
                "Monte Carlo Pi Estimation (Async)",
                runtime.block_on(estimate_pi_async(&config)),
            )
        }
        _ => {
            eprintln!("Unknown mode: {}", mode);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    };
    let elapsed = start.elapsed();

    match outcome {
        Ok(estimate) => {
            print_estimate(title, &estimate);
            println!("Workers: {}", worker_count);
            println!("Total time: {}ms", elapsed.as_millis());
        }
        Err(e) => {
            eprintln!("Estimation failed: {}", e);
            std::process::exit(1);
        }
    }
}
