//! Configuration for the netcode-sim application.
//!
//! Handles parsing command-line arguments and filling in defaults.
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments. When no seed is given one is
//! derived from the clock and printed, so any run can be repeated exactly.

use crate::topologies::TopologyChoice;
use netcode_sim_core::orchestrator::{Reducer, TrialConfig};

/// Default number of trials per strategy.
pub const DEFAULT_TRIALS: usize = 500;

/// Complete configuration for a CLI run.
#[derive(Debug, Clone)]
pub struct Config {
    // === Scenario ===
    /// Which topology (or all of them) to simulate
    pub topology: TopologyChoice,

    // === Trials ===
    /// Trial count, reducer, seed and parallelism
    pub trials: TrialConfig,

    // === Behavior ===
    /// Whether to print the labelled network of each strategy's best trial
    pub print_network: bool,

    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print detailed metrics summary
    pub print_metrics: bool,
}

impl Config {
    /// Parse configuration from command-line arguments.
    ///
    /// If --seed is omitted, a time-based seed is used.
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut topology = TopologyChoice::Butterfly;
        let mut trials: Option<usize> = None;
        let mut reducer = Reducer::Max;
        let mut seed: Option<u64> = None;
        let mut parallel = false;
        let mut print_network = false;
        let mut print_config = false;
        let mut print_metrics = true;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--topology" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--topology requires a name".to_string());
                    }
                    topology = TopologyChoice::parse(&args[i])
                        .ok_or_else(|| format!("unknown topology: {}", args[i]))?;
                }
                "--trials" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--trials requires a number".to_string());
                    }
                    let n: usize = args[i].parse().map_err(|_| "invalid trials")?;
                    if n == 0 {
                        return Err("--trials must be at least 1".to_string());
                    }
                    trials = Some(n);
                }
                "--reducer" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--reducer requires max or mean".to_string());
                    }
                    reducer = match args[i].as_str() {
                        "max" => Reducer::Max,
                        "mean" => Reducer::Mean,
                        other => return Err(format!("unknown reducer: {}", other)),
                    };
                }
                "--seed" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--seed requires a number".to_string());
                    }
                    seed = Some(args[i].parse().map_err(|_| "invalid seed")?);
                }
                "--parallel" => {
                    parallel = true;
                }
                "--print-network" => {
                    print_network = true;
                }
                "--print-config" => {
                    print_config = true;
                }
                "--no-metrics" => {
                    print_metrics = false;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {
                    return Err(format!("unknown argument: {}", args[i]));
                }
            }
            i += 1;
        }

        // Determine seed (explicit or time-based)
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

        let mut trial_config = TrialConfig::new(trials.unwrap_or(DEFAULT_TRIALS), reducer, seed);
        trial_config.parallel = parallel;

        Ok(Config {
            topology,
            trials: trial_config,
            print_network,
            print_config,
            print_metrics,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Topology: {}", self.topology.name());
        println!("Trials: {}", self.trials.trials);
        println!("Reducer: {}", self.trials.reducer);
        println!("Seed: {}", self.trials.seed);
        println!("Parallel: {}", self.trials.parallel);
        println!();
    }
}

fn print_help() {
    println!("netcode-sim: Multicast throughput with and without network coding");
    println!();
    println!("USAGE:");
    println!("    netcode-sim [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --topology <NAME>   butterfly, direct, three-branch, wide-star, all (default: butterfly)");
    println!("    --trials <N>        Trials per strategy (default: {})", DEFAULT_TRIALS);
    println!("    --reducer <R>       max or mean (default: max)");
    println!("    --seed <N>          Random seed for determinism");
    println!("    --parallel          Run trials on all cores");
    println!();
    println!("    --print-network     Show link symbols of each strategy's best trial");
    println!("    --print-config      Print resolved configuration");
    println!("    --no-metrics        Don't print metrics summary");
    println!("    --help, -h          Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    netcode-sim                                  # Butterfly, 500 trials, best case");
    println!("    netcode-sim --seed 42                        # Deterministic run");
    println!("    netcode-sim --topology all --reducer mean    # Expected case everywhere");
    println!();
    println!("Set RUST_LOG=debug to trace individual trials.");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_args(&[]).unwrap();
        assert_eq!(config.topology, TopologyChoice::Butterfly);
        assert_eq!(config.trials.trials, DEFAULT_TRIALS);
        assert_eq!(config.trials.reducer, Reducer::Max);
        assert!(!config.trials.parallel);
        assert!(config.print_metrics);
    }

    #[test]
    fn test_full_argument_set() {
        let config = Config::from_args(&args(&[
            "--topology",
            "all",
            "--trials",
            "20",
            "--reducer",
            "mean",
            "--seed",
            "42",
            "--parallel",
            "--print-network",
            "--no-metrics",
        ]))
        .unwrap();

        assert_eq!(config.topology, TopologyChoice::All);
        assert_eq!(config.trials.trials, 20);
        assert_eq!(config.trials.reducer, Reducer::Mean);
        assert_eq!(config.trials.seed, 42);
        assert!(config.trials.parallel);
        assert!(config.print_network);
        assert!(!config.print_metrics);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::from_args(&args(&["--trials", "0"])).is_err());
        assert!(Config::from_args(&args(&["--trials"])).is_err());
        assert!(Config::from_args(&args(&["--reducer", "median"])).is_err());
        assert!(Config::from_args(&args(&["--topology", "ring"])).is_err());
        assert!(Config::from_args(&args(&["--bogus"])).is_err());
    }
}
