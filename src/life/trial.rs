use rand::SeedableRng;
use rand::rngs::StdRng;

use super::grid::BoundaryPolicy;
use super::rules::RuleVariant;
use super::seed::{SeedError, SeedPattern};

/// Everything one trial needs besides its rng seed. Shared read-only across
/// the worker pool; the grid itself is private to each trial.
#[derive(Debug, Clone, Copy)]
pub struct TrialSpec {
    pub pattern: SeedPattern,
    pub rows: usize,
    pub cols: usize,
    pub noise_level: f64,
    pub generations: u32,
    pub rule: RuleVariant,
    pub boundary: BoundaryPolicy,
}

/// Place the seed pattern centered in a dead grid, advance it `generations`
/// times, and return the final live-cell count. All randomness comes from
/// the given seed, so equal inputs give bit-identical results.
pub fn run_trial(spec: &TrialSpec, rng_seed: u64) -> Result<u32, SeedError> {
    let mut rng = StdRng::seed_from_u64(rng_seed);
    let mut grid = spec.pattern.place_centered(spec.rows, spec.cols)?;
    for _ in 0..spec.generations {
        grid = spec
            .rule
            .step(&grid, spec.noise_level, spec.boundary, &mut rng);
    }
    Ok(grid.live_count())
}
