//! netcode-sim: compare routing and network coding on fixed topologies.
//!
//! For each selected topology the plain and coded strategies are run for the
//! configured number of trials, reduced, and compared by throughput gained
//! per unit of extra buffering.

mod config;
mod topologies;

use config::Config;
use log::{error, info, warn};
use netcode_sim_core::metrics::Metrics;
use netcode_sim_core::orchestrator::{compare, Comparison, TrialSummary};
use netcode_sim_core::{Error, Scenario};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("run with --help for usage");
            std::process::exit(2);
        }
    };

    if config.print_config {
        config.print();
    }
    info!("seed {}", config.trials.seed);

    let mut metrics = Metrics::new();

    for (name, scenario) in config.topology.build() {
        println!("===== Topology: {} =====", name);
        match compare(&scenario, &config.trials) {
            Ok(comparison) => {
                report(&scenario, &comparison, config.print_network);
                metrics.record_comparison(&comparison);
            }
            Err(Error::Unsupported(reason)) => {
                warn!("skipping {}: {}", name, reason);
                println!("Not supported: {}", reason);
                println!();
                metrics.record_unsupported();
            }
            Err(e) => {
                error!("{} failed: {}", name, e);
                println!("Failed: {}", e);
                println!();
                metrics.record_failure();
            }
        }
    }

    metrics.complete();
    if config.print_metrics {
        metrics.print_summary();
    }

    if metrics.topologies_failed > 0 {
        std::process::exit(1);
    }
}

fn report(scenario: &Scenario, comparison: &Comparison, print_network: bool) {
    println!("Sinks: {}", scenario.sink_labels().join(", "));
    println!();
    for summary in [&comparison.plain, &comparison.coded] {
        print_summary(scenario, summary, print_network);
    }

    match comparison.ratio {
        Some(ratio) => println!("Efficiency ratio (throughput gain / memory cost): {:.3}", ratio),
        None => println!("Efficiency ratio: undefined (zero memory or throughput)"),
    }
    println!();
}

fn print_summary(scenario: &Scenario, summary: &TrialSummary, print_network: bool) {
    let heading = match summary.strategy {
        netcode_sim_core::Strategy::Plain => "Without Network Coding",
        netcode_sim_core::Strategy::Coded => "With Network Coding",
    };
    println!("--- {} ---", heading);
    println!(
        "Network throughput ({} of {} trials) = {:.3}",
        summary.reducer, summary.trials, summary.throughput
    );
    println!("Memory used = {}", summary.memory_used);
    println!(
        "Full-rate trials = {} ({:.1}%)",
        summary.full_rate_trials,
        summary.full_rate_trials as f64 / summary.trials as f64 * 100.0
    );
    println!("Best trial per-sink symbols = {:?}", summary.best.score.per_sink);

    if print_network {
        print!(
            "{}",
            scenario
                .topology
                .render(scenario.source, Some(&summary.best.assignment.labels))
        );
    }
    println!();
}
