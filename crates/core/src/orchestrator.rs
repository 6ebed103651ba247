//! Repeated trials, reduction, and the coded-versus-plain comparison.
//!
//! Every trial labels a fresh [`LinkLabels`](crate::symbol::LinkLabels) map,
//! so trials share nothing but the immutable topology. That makes them safe
//! to run on rayon's pool: each trial index owns its own ChaCha8 stream, and
//! outcomes are reduced in trial order, so the parallel runner reports exactly
//! what the same seed gives on any thread count.
//!
//! # Reducers
//!
//! - `Max`: the first trial with the highest throughput, with its own memory cost
//! - `Mean`: average throughput; memory is the rounded average memory

use crate::engine::{assign, Assignment, Strategy};
use crate::error::{Error, Result};
use crate::scenario::{Scenario, SupportedConfig};
use crate::scorer::{score, Score};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::fmt;

/// How per-trial results are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    /// Best case found
    Max,
    /// Expected case
    Mean,
}

impl Reducer {
    pub fn name(self) -> &'static str {
        match self {
            Reducer::Max => "max",
            Reducer::Mean => "mean",
        }
    }
}

impl fmt::Display for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings shared by both strategies of a comparison.
#[derive(Debug, Clone, Copy)]
pub struct TrialConfig {
    /// Number of trials per strategy
    pub trials: usize,

    pub reducer: Reducer,

    /// Random seed for determinism
    pub seed: u64,

    /// Spread trials across the rayon thread pool
    pub parallel: bool,
}

impl TrialConfig {
    pub fn new(trials: usize, reducer: Reducer, seed: u64) -> Self {
        Self {
            trials,
            reducer,
            seed,
            parallel: false,
        }
    }
}

/// One assignment and its score.
#[derive(Debug, Clone)]
pub struct TrialOutcome {
    pub assignment: Assignment,
    pub score: Score,
}

/// Reduced result of many trials of one strategy.
#[derive(Debug, Clone)]
pub struct TrialSummary {
    pub strategy: Strategy,
    pub reducer: Reducer,
    pub trials: usize,

    /// Reduced network throughput
    pub throughput: f64,

    /// Memory paired with `throughput`
    pub memory_used: u32,

    /// Trials where every sink received every packet
    pub full_rate_trials: usize,

    /// First trial with the highest throughput
    pub best: TrialOutcome,
}

/// Coded and plain summaries for the same scenario.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub plain: TrialSummary,
    pub coded: TrialSummary,

    /// `None` when the ratio is undefined
    pub ratio: Option<f64>,
}

impl Comparison {
    pub fn new(plain: TrialSummary, coded: TrialSummary) -> Self {
        let ratio = efficiency_ratio(
            plain.throughput,
            plain.memory_used,
            coded.throughput,
            coded.memory_used,
        );
        Self {
            plain,
            coded,
            ratio,
        }
    }
}

/// Throughput gain of coding per unit of extra memory.
///
/// `(coded_tp / plain_tp) / (coded_mem / plain_mem)`, or `None` if any
/// denominator is zero.
pub fn efficiency_ratio(
    plain_throughput: f64,
    plain_memory: u32,
    coded_throughput: f64,
    coded_memory: u32,
) -> Option<f64> {
    if plain_memory == 0 || coded_memory == 0 || plain_throughput == 0.0 {
        return None;
    }
    let gain = coded_throughput / plain_throughput;
    let cost = coded_memory as f64 / plain_memory as f64;
    Some(gain / cost)
}

/// Assign and score a single trial. Preconditions are not re-checked here.
pub fn run_trial<R: Rng + ?Sized>(
    scenario: &Scenario,
    strategy: Strategy,
    rng: &mut R,
) -> Result<TrialOutcome> {
    let assignment = assign(
        strategy,
        &scenario.topology,
        scenario.source,
        scenario.num_packets,
        rng,
    )?;
    let score = score(
        &scenario.topology,
        &assignment,
        &scenario.sinks,
        strategy,
        scenario.num_packets,
    );
    Ok(TrialOutcome { assignment, score })
}

/// Run `trials` sequential trials drawing from `rng` and reduce them.
pub fn run_trials<R: Rng + ?Sized>(
    scenario: &Scenario,
    strategy: Strategy,
    trials: usize,
    reducer: Reducer,
    rng: &mut R,
) -> Result<TrialSummary> {
    check_preconditions(scenario, trials)?;

    let mut reduction = Reduction::new(scenario.num_packets);
    for trial in 0..trials {
        let outcome = run_trial(scenario, strategy, &mut *rng)?;
        log_trial(strategy, trial, &outcome);
        reduction.push(outcome);
    }

    finish(reduction, strategy, reducer)
}

/// Run `trials` trials on the rayon pool, one ChaCha8 stream per trial.
pub fn run_trials_parallel(
    scenario: &Scenario,
    strategy: Strategy,
    trials: usize,
    reducer: Reducer,
    seed: u64,
) -> Result<TrialSummary> {
    check_preconditions(scenario, trials)?;

    let outcomes = (0..trials)
        .into_par_iter()
        .map(|trial| {
            let mut rng = trial_rng(seed, strategy, trial);
            run_trial(scenario, strategy, &mut rng)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut reduction = Reduction::new(scenario.num_packets);
    for (trial, outcome) in outcomes.into_iter().enumerate() {
        log_trial(strategy, trial, &outcome);
        reduction.push(outcome);
    }

    finish(reduction, strategy, reducer)
}

/// Run one strategy according to `config`.
pub fn run_strategy(scenario: &Scenario, strategy: Strategy, config: &TrialConfig) -> Result<TrialSummary> {
    if config.parallel {
        run_trials_parallel(scenario, strategy, config.trials, config.reducer, config.seed)
    } else {
        let mut rng = strategy_rng(config.seed, strategy);
        run_trials(scenario, strategy, config.trials, config.reducer, &mut rng)
    }
}

/// Run both strategies and compute the efficiency ratio.
pub fn compare(scenario: &Scenario, config: &TrialConfig) -> Result<Comparison> {
    let plain = run_strategy(scenario, Strategy::Plain, config)?;
    let coded = run_strategy(scenario, Strategy::Coded, config)?;
    let comparison = Comparison::new(plain, coded);

    match comparison.ratio {
        Some(ratio) => info!(
            "comparison over {} trials ({}): plain {:.3}, coded {:.3}, ratio {:.3}",
            config.trials, config.reducer, comparison.plain.throughput, comparison.coded.throughput, ratio
        ),
        None => info!(
            "comparison over {} trials ({}): plain {:.3}, coded {:.3}, ratio undefined",
            config.trials, config.reducer, comparison.plain.throughput, comparison.coded.throughput
        ),
    }

    Ok(comparison)
}

/// RNG for a sequential run of `strategy`.
fn strategy_rng(seed: u64, strategy: Strategy) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream_tag(strategy));
    rng
}

/// RNG for trial `trial` of a parallel run.
fn trial_rng(seed: u64, strategy: Strategy, trial: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(((trial as u64 + 1) << 1) | stream_tag(strategy));
    rng
}

fn stream_tag(strategy: Strategy) -> u64 {
    match strategy {
        Strategy::Plain => 0,
        Strategy::Coded => 1,
    }
}

fn check_preconditions(scenario: &Scenario, trials: usize) -> Result<()> {
    if trials == 0 {
        return Err(Error::Config("trial count must be at least 1".to_string()));
    }
    scenario.validate()?;
    SupportedConfig::check(scenario)?;
    Ok(())
}

fn log_trial(strategy: Strategy, trial: usize, outcome: &TrialOutcome) {
    debug!(
        "{} trial {}: per_sink={:?} throughput={:.3} memory={}",
        strategy, trial, outcome.score.per_sink, outcome.score.throughput, outcome.score.memory_used
    );
}

/// Running state while trials are folded together.
struct Reduction {
    num_packets: usize,
    trials: usize,
    throughput_sum: f64,
    memory_sum: u64,
    full_rate_trials: usize,
    best: Option<TrialOutcome>,
}

impl Reduction {
    fn new(num_packets: usize) -> Self {
        Self {
            num_packets,
            trials: 0,
            throughput_sum: 0.0,
            memory_sum: 0,
            full_rate_trials: 0,
            best: None,
        }
    }

    fn push(&mut self, outcome: TrialOutcome) {
        self.trials += 1;
        self.throughput_sum += outcome.score.throughput;
        self.memory_sum += u64::from(outcome.score.memory_used);
        if outcome.score.is_full_rate(self.num_packets) {
            self.full_rate_trials += 1;
        }

        // Strictly greater keeps the earliest best trial
        let better = match &self.best {
            Some(best) => outcome.score.throughput > best.score.throughput,
            None => true,
        };
        if better {
            self.best = Some(outcome);
        }
    }
}

fn finish(reduction: Reduction, strategy: Strategy, reducer: Reducer) -> Result<TrialSummary> {
    let best = reduction
        .best
        .ok_or_else(|| Error::Config("no trials were run".to_string()))?;

    let (throughput, memory_used) = match reducer {
        Reducer::Max => (best.score.throughput, best.score.memory_used),
        Reducer::Mean => {
            let n = reduction.trials as f64;
            let memory = (reduction.memory_sum as f64 / n).round() as u32;
            (reduction.throughput_sum / n, memory)
        }
    };

    info!(
        "{} strategy, {} of {} trials: throughput {:.3}, memory {}, full-rate trials {}",
        strategy, reducer, reduction.trials, throughput, memory_used, reduction.full_rate_trials
    );

    Ok(TrialSummary {
        strategy,
        reducer,
        trials: reduction.trials,
        throughput,
        memory_used,
        full_rate_trials: reduction.full_rate_trials,
        best,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnsupportedConfig;
    use crate::graph::Topology;
    use crate::scenario::PACKETS;

    fn butterfly() -> Scenario {
        let mut t = Topology::new();
        let s = t.add_node("S");
        let tt = t.add_node("T");
        let u = t.add_node("U");
        let w = t.add_node("W");
        let x = t.add_node("X");
        let y = t.add_node("Y");
        let z = t.add_node("Z");
        t.create_link(s, tt, 1.0);
        t.create_link(s, u, 1.0);
        t.create_link(tt, w, 1.0);
        t.create_link(tt, y, 1.0);
        t.create_link(u, w, 1.0);
        t.create_link(u, z, 1.0);
        t.create_link(x, y, 1.0);
        t.create_link(x, z, 1.0);
        t.create_link(w, x, 1.0);
        Scenario::new(t, s, vec![y, z], PACKETS)
    }

    fn star(links: usize) -> Scenario {
        let mut t = Topology::new();
        let s = t.add_node("S");
        let sinks = (0..links)
            .map(|i| {
                let n = t.add_node(format!("D{}", i));
                t.create_link(s, n, 1.0);
                n
            })
            .collect();
        Scenario::new(t, s, sinks, PACKETS)
    }

    #[test]
    fn test_efficiency_ratio() {
        let ratio = efficiency_ratio(1.5, 2, 2.0, 3).unwrap();
        assert!((ratio - 0.888_888_888).abs() < 1e-6);
    }

    #[test]
    fn test_efficiency_ratio_undefined() {
        assert_eq!(efficiency_ratio(1.5, 0, 2.0, 3), None);
        assert_eq!(efficiency_ratio(1.5, 2, 2.0, 0), None);
        assert_eq!(efficiency_ratio(0.0, 2, 2.0, 3), None);
    }

    #[test]
    fn test_direct_sinks_get_one_symbol() {
        let scenario = star(2);
        let config = TrialConfig::new(50, Reducer::Max, 9);
        let comparison = compare(&scenario, &config).unwrap();

        assert_eq!(comparison.plain.throughput, 1.0);
        assert_eq!(comparison.coded.throughput, 1.0);
        assert_eq!(comparison.plain.best.score.per_sink, vec![1, 1]);
        assert_eq!(comparison.coded.best.score.per_sink, vec![1, 1]);
    }

    #[test]
    fn test_direct_sinks_memory_is_one_per_sink() {
        let scenario = star(2);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let summary = run_trials(&scenario, Strategy::Coded, 10, Reducer::Mean, &mut rng).unwrap();
        assert_eq!(summary.memory_used, 2);
    }

    #[test]
    fn test_single_trial_is_reproducible() {
        let scenario = butterfly();
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            run_trials(&scenario, Strategy::Coded, 1, Reducer::Max, &mut rng).unwrap()
        };
        let first = run(1234);
        let second = run(1234);
        assert_eq!(first.throughput, second.throughput);
        assert_eq!(first.memory_used, second.memory_used);
        assert_eq!(first.best.assignment, second.best.assignment);
    }

    #[test]
    fn test_unsupported_fanout_is_reported() {
        let scenario = star(4);
        let config = TrialConfig::new(10, Reducer::Max, 0);
        match compare(&scenario, &config) {
            Err(Error::Unsupported(UnsupportedConfig::SourceFanout { out_degree })) => {
                assert_eq!(out_degree, 4)
            }
            other => panic!("expected unsupported fan-out, got {:?}", other.map(|c| c.ratio)),
        }
    }

    #[test]
    fn test_unsupported_packet_count_is_reported() {
        let mut scenario = butterfly();
        scenario.num_packets = 3;
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let result = run_trials(&scenario, Strategy::Plain, 5, Reducer::Max, &mut rng);
        assert!(matches!(
            result,
            Err(Error::Unsupported(UnsupportedConfig::PacketCount { num_packets: 3 }))
        ));
    }

    #[test]
    fn test_zero_trials_rejected() {
        let scenario = butterfly();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(
            run_trials(&scenario, Strategy::Plain, 0, Reducer::Max, &mut rng),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_max_not_below_mean() {
        let scenario = butterfly();
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let max = run_trials(&scenario, Strategy::Coded, 200, Reducer::Max, &mut rng).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let mean = run_trials(&scenario, Strategy::Coded, 200, Reducer::Mean, &mut rng).unwrap();

        assert!(max.throughput >= mean.throughput);
        assert_eq!(max.full_rate_trials, mean.full_rate_trials);
        assert_eq!(max.throughput, 2.0);
        assert!(mean.throughput > 1.0 && mean.throughput < 2.0);
    }

    #[test]
    fn test_plain_butterfly_never_full_rate() {
        let scenario = butterfly();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let summary = run_trials(&scenario, Strategy::Plain, 300, Reducer::Max, &mut rng).unwrap();
        assert_eq!(summary.full_rate_trials, 0);
        assert_eq!(summary.throughput, 1.5);
        assert_eq!(summary.memory_used, 6);
    }

    #[test]
    fn test_parallel_is_deterministic() {
        let scenario = butterfly();
        let a = run_trials_parallel(&scenario, Strategy::Coded, 64, Reducer::Mean, 99).unwrap();
        let b = run_trials_parallel(&scenario, Strategy::Coded, 64, Reducer::Mean, 99).unwrap();
        assert_eq!(a.throughput, b.throughput);
        assert_eq!(a.full_rate_trials, b.full_rate_trials);
        assert_eq!(a.best.assignment, b.best.assignment);
    }

    #[test]
    fn test_parallel_compare_matches_config() {
        let scenario = butterfly();
        let mut config = TrialConfig::new(100, Reducer::Max, 3);
        config.parallel = true;
        let comparison = compare(&scenario, &config).unwrap();
        assert_eq!(comparison.plain.trials, 100);
        assert_eq!(comparison.coded.trials, 100);
        assert!(comparison.ratio.is_some());
    }
}
