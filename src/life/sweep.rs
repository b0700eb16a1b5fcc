use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread;

use crossbeam_channel::{Receiver, Sender, unbounded};
use thiserror::Error;
use tracing::{error, info};

use crate::config::{ConfigError, SimConfig};

use super::seed::SeedPattern;
use super::stats::{AggregateStat, summarize};
use super::trial::{TrialSpec, run_trial};

/// One output row per (noise level, seed pattern) group, in the stable
/// sweep order: noise levels outer, pattern ids inner.
#[derive(Debug, Clone)]
pub struct SweepRow {
    pub noise_level: f64,
    pub pattern_id: u16,
    pub outcome: Result<AggregateStat, GroupError>,
}

/// A group whose trials did not all complete. The group produces no
/// aggregate; a partial average is never emitted.
#[derive(Debug, Clone, Error)]
#[error("trial {trial} of pattern {pattern} at noise {noise} failed: {message}")]
pub struct GroupError {
    pub pattern: u16,
    pub noise: f64,
    pub trial: u32,
    pub message: String,
}

struct Job {
    noise_idx: usize,
    pattern_idx: usize,
    trial: u32,
    rng_seed: u64,
    spec: TrialSpec,
}

struct Outcome {
    noise_idx: usize,
    pattern_idx: usize,
    trial: u32,
    result: Result<u32, String>,
}

/// Run the full sweep on a fixed-size worker pool and reduce each
/// (pattern, noise) group to summary statistics once all of its trials have
/// returned.
pub fn run(config: &SimConfig) -> Result<Vec<SweepRow>, ConfigError> {
    config.validate()?;

    let patterns: Vec<SeedPattern> = config
        .pattern_ids()
        .into_iter()
        .map(|id| SeedPattern::from_id(id).expect("validated pattern id"))
        .collect();
    let levels = config.noise.levels();
    let trials = config.run.trials_per_point;
    let workers = config.worker_threads();
    let boundary = config.boundary();

    info!(
        patterns = patterns.len(),
        noise_levels = levels.len(),
        trials_per_point = trials,
        workers,
        rule = ?config.rule,
        "starting sweep"
    );

    let (job_tx, job_rx) = unbounded::<Job>();
    let (result_tx, result_rx) = unbounded::<Outcome>();

    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let rx = job_rx.clone();
        let tx = result_tx.clone();
        handles.push(thread::spawn(move || worker(rx, tx)));
    }
    drop(job_rx);
    drop(result_tx);

    for (noise_idx, &noise_level) in levels.iter().enumerate() {
        for (pattern_idx, pattern) in patterns.iter().enumerate() {
            let spec = TrialSpec {
                pattern: *pattern,
                rows: config.grid.rows,
                cols: config.grid.cols,
                noise_level,
                generations: config.run.generations,
                rule: config.rule,
                boundary,
            };
            for trial in 0..trials {
                let rng_seed = trial_seed(
                    config.run.base_seed,
                    pattern.id(),
                    noise_idx as u64,
                    u64::from(trial),
                );
                job_tx
                    .send(Job {
                        noise_idx,
                        pattern_idx,
                        trial,
                        rng_seed,
                        spec,
                    })
                    .expect("job channel closed before the sweep finished");
            }
        }
    }
    drop(job_tx);

    // Collect until every worker has drained its jobs and hung up. Groups
    // are only reduced after this barrier.
    let mut groups: Vec<Vec<GroupAccum>> =
        vec![vec![GroupAccum::default(); patterns.len()]; levels.len()];
    for outcome in result_rx {
        let accum = &mut groups[outcome.noise_idx][outcome.pattern_idx];
        match outcome.result {
            Ok(count) => accum.samples.push(f64::from(count)),
            Err(message) => {
                accum.failure.get_or_insert((outcome.trial, message));
            }
        }
    }
    for handle in handles {
        let _ = handle.join();
    }

    let mut rows = Vec::with_capacity(levels.len() * patterns.len());
    for (noise_idx, &noise_level) in levels.iter().enumerate() {
        for (pattern_idx, pattern) in patterns.iter().enumerate() {
            let accum = &groups[noise_idx][pattern_idx];
            let outcome = match &accum.failure {
                None => Ok(summarize(&accum.samples)),
                Some((trial, message)) => {
                    let err = GroupError {
                        pattern: pattern.id(),
                        noise: noise_level,
                        trial: *trial,
                        message: message.clone(),
                    };
                    error!(%err, "discarding group");
                    Err(err)
                }
            };
            rows.push(SweepRow {
                noise_level,
                pattern_id: pattern.id(),
                outcome,
            });
        }
    }
    Ok(rows)
}

#[derive(Debug, Clone, Default)]
struct GroupAccum {
    samples: Vec<f64>,
    failure: Option<(u32, String)>,
}

fn worker(jobs: Receiver<Job>, results: Sender<Outcome>) {
    while let Ok(job) = jobs.recv() {
        // A panicking trial must not take the sweep down; it is reported
        // with enough context to reproduce and fails its whole group.
        let result = match catch_unwind(AssertUnwindSafe(|| run_trial(&job.spec, job.rng_seed))) {
            Ok(Ok(count)) => Ok(count),
            Ok(Err(err)) => Err(err.to_string()),
            Err(panic) => Err(panic_message(&panic)),
        };
        let _ = results.send(Outcome {
            noise_idx: job.noise_idx,
            pattern_idx: job.pattern_idx,
            trial: job.trial,
            result,
        });
    }
}

fn panic_message(panic: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "trial panicked".to_string()
    }
}

/// Deterministic per-trial rng seed from trial identity, so results are
/// independent of worker scheduling.
pub fn trial_seed(base: u64, pattern: u16, noise_idx: u64, trial: u64) -> u64 {
    let mut seed = splitmix64(base ^ 0x9e37_79b9_7f4a_7c15);
    seed = splitmix64(seed ^ u64::from(pattern));
    seed = splitmix64(seed ^ noise_idx);
    splitmix64(seed ^ trial)
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}
