//! Metrics collection and reporting across a whole run.
//!
//! Tracks, for every topology the CLI processes:
//! - How many comparisons completed, were unsupported, or failed
//! - Per-strategy trial counts and full-rate trials
//! - Reduced throughput and memory figures
//! - Efficiency ratios (when defined)
//!
//! # Thread Safety
//!
//! The `Metrics` struct is NOT thread-safe. Trials may run in parallel, but
//! results are recorded from a single thread after each comparison.

use crate::engine::Strategy;
use crate::orchestrator::{Comparison, TrialSummary};
use std::time::{Duration, Instant};

/// Accumulated figures for one strategy.
#[derive(Debug, Clone, Default)]
pub struct StrategyMetrics {
    /// Comparisons contributing to these figures
    pub runs: u64,

    /// Total trials executed
    pub trials: u64,

    /// Trials where every sink received every packet
    pub full_rate_trials: u64,

    /// Sum of reduced throughputs
    pub throughput_sum: f64,

    /// Sum of reduced memory figures
    pub memory_sum: u64,

    /// Highest reduced throughput seen
    pub best_throughput: f64,
}

impl StrategyMetrics {
    fn record(&mut self, summary: &TrialSummary) {
        self.runs += 1;
        self.trials += summary.trials as u64;
        self.full_rate_trials += summary.full_rate_trials as u64;
        self.throughput_sum += summary.throughput;
        self.memory_sum += u64::from(summary.memory_used);
        if summary.throughput > self.best_throughput {
            self.best_throughput = summary.throughput;
        }
    }

    /// Fraction of trials that reached full rate.
    pub fn full_rate_fraction(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.full_rate_trials as f64 / self.trials as f64
        }
    }

    /// Mean reduced throughput per comparison.
    pub fn mean_throughput(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.throughput_sum / self.runs as f64
        }
    }

    /// Mean reduced memory per comparison.
    pub fn mean_memory(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.memory_sum as f64 / self.runs as f64
        }
    }
}

/// Metrics for a full CLI run.
#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Topologies ===
    /// Comparisons that completed
    pub topologies_run: u64,

    /// Topologies skipped as unsupported
    pub topologies_unsupported: u64,

    /// Topologies that failed validation
    pub topologies_failed: u64,

    // === Strategies ===
    pub plain: StrategyMetrics,
    pub coded: StrategyMetrics,

    // === Efficiency ===
    /// Comparisons with a defined ratio
    pub ratios_defined: u64,

    /// Sum of defined ratios
    pub ratio_sum: f64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            topologies_run: 0,
            topologies_unsupported: 0,
            topologies_failed: 0,
            plain: StrategyMetrics::default(),
            coded: StrategyMetrics::default(),
            ratios_defined: 0,
            ratio_sum: 0.0,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Record a completed comparison.
    pub fn record_comparison(&mut self, comparison: &Comparison) {
        self.topologies_run += 1;
        self.plain.record(&comparison.plain);
        self.coded.record(&comparison.coded);
        if let Some(ratio) = comparison.ratio {
            self.ratios_defined += 1;
            self.ratio_sum += ratio;
        }
    }

    pub fn record_unsupported(&mut self) {
        self.topologies_unsupported += 1;
    }

    pub fn record_failure(&mut self) {
        self.topologies_failed += 1;
    }

    pub fn strategy(&self, strategy: Strategy) -> &StrategyMetrics {
        match strategy {
            Strategy::Plain => &self.plain,
            Strategy::Coded => &self.coded,
        }
    }

    /// Fraction of a strategy's trials that reached full rate.
    pub fn full_rate_fraction(&self, strategy: Strategy) -> f64 {
        self.strategy(strategy).full_rate_fraction()
    }

    /// Mean of the defined efficiency ratios.
    pub fn mean_ratio(&self) -> Option<f64> {
        if self.ratios_defined == 0 {
            None
        } else {
            Some(self.ratio_sum / self.ratios_defined as f64)
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("=== Topologies ===");
        println!("Compared: {}", self.topologies_run);
        println!("Unsupported: {}", self.topologies_unsupported);
        println!("Failed: {}", self.topologies_failed);
        println!();

        for strategy in [Strategy::Plain, Strategy::Coded] {
            let m = self.strategy(strategy);
            println!("=== {} ===", strategy);
            println!("Trials: {}", m.trials);
            println!(
                "Full-rate trials: {} ({:.2}%)",
                m.full_rate_trials,
                m.full_rate_fraction() * 100.0
            );
            println!("Mean throughput: {:.3}", m.mean_throughput());
            println!("Best throughput: {:.3}", m.best_throughput);
            println!("Mean memory: {:.2}", m.mean_memory());
            println!();
        }

        println!("=== Efficiency ===");
        match self.mean_ratio() {
            Some(ratio) => println!("Mean ratio: {:.3} over {} topologies", ratio, self.ratios_defined),
            None => println!("Mean ratio: undefined"),
        }
        println!("Duration: {} ms", self.duration().as_millis());
        println!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             topologies_run={}\n\
             topologies_unsupported={}\n\
             topologies_failed={}\n\
             plain_trials={}\n\
             plain_full_rate={:.4}\n\
             plain_mean_throughput={:.4}\n\
             coded_trials={}\n\
             coded_full_rate={:.4}\n\
             coded_mean_throughput={:.4}\n\
             ratios_defined={}\n",
            self.duration().as_millis(),
            self.topologies_run,
            self.topologies_unsupported,
            self.topologies_failed,
            self.plain.trials,
            self.plain.full_rate_fraction(),
            self.plain.mean_throughput(),
            self.coded.trials,
            self.coded.full_rate_fraction(),
            self.coded.mean_throughput(),
            self.ratios_defined,
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
