use clap::ValueEnum;
use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use super::grid::{BoundaryPolicy, Field, Grid, in_bounds_neighbors};
use super::noise;

/// Transition rule family. Every variant applies the canonical Life decision
/// (alive survives on {2,3}, dead is born on 3) to its own estimate of the
/// true neighbor count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RuleVariant {
    /// Raw neighbor counts, noise ignored.
    Standard,
    /// Raw counts plus ±1 sensing noise, floored at 0.
    NoisyStandard,
    /// Single global linear correction of the noised count.
    RegressionCorrected,
    /// Piecewise-linear correction keyed on the noised-count bucket, with
    /// the neighbors' noised-count sum as a second regressor.
    TieredRegressionCorrected,
    /// Decide from a simulated noisy step ahead.
    TwoStepLookahead,
    /// Cells dying from a noise artifact bump four random neighbors' counts.
    DistressSignal,
}

impl RuleVariant {
    /// Boundary policy used by the original study for this variant; the
    /// config may override it.
    pub fn default_boundary(self) -> BoundaryPolicy {
        match self {
            RuleVariant::Standard | RuleVariant::NoisyStandard | RuleVariant::DistressSignal => {
                BoundaryPolicy::ZeroPadded
            }
            RuleVariant::RegressionCorrected
            | RuleVariant::TieredRegressionCorrected
            | RuleVariant::TwoStepLookahead => BoundaryPolicy::Wrap,
        }
    }

    /// Advance one generation. The input grid is never mutated.
    pub fn step<R: Rng + ?Sized>(
        self,
        grid: &Grid,
        noise_level: f64,
        boundary: BoundaryPolicy,
        rng: &mut R,
    ) -> Grid {
        match self {
            RuleVariant::Standard => step_standard(grid, boundary),
            RuleVariant::NoisyStandard => step_noisy_standard(grid, noise_level, boundary, rng),
            RuleVariant::RegressionCorrected => {
                step_regression(grid, noise_level, boundary, rng)
            }
            RuleVariant::TieredRegressionCorrected => {
                step_tiered_regression(grid, noise_level, boundary, rng)
            }
            RuleVariant::TwoStepLookahead => step_two_step(grid, noise_level, boundary, rng),
            RuleVariant::DistressSignal => step_distress(grid, noise_level, boundary, rng),
        }
    }
}

/// Canonical Life decision on a count estimate.
#[inline]
fn decide(cell: u8, estimate: i32) -> u8 {
    if cell == 1 {
        u8::from(estimate == 2 || estimate == 3)
    } else {
        u8::from(estimate == 3)
    }
}

fn decide_field(grid: &Grid, estimates: &Field) -> Grid {
    let mut next = Grid::new_dead(grid.rows(), grid.cols());
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            next.set(row, col, decide(grid.get(row, col), estimates.get(row, col)));
        }
    }
    next
}

fn step_standard(grid: &Grid, boundary: BoundaryPolicy) -> Grid {
    let counts = grid.neighbor_counts(boundary);
    decide_field(grid, &counts)
}

fn step_noisy_standard<R: Rng + ?Sized>(
    grid: &Grid,
    noise_level: f64,
    boundary: BoundaryPolicy,
    rng: &mut R,
) -> Grid {
    let mut counts = grid.neighbor_counts(boundary);
    noise::perturb(&mut counts, noise_level, rng);
    // Counts cannot go below zero; there is no upper clip.
    for v in counts.values_mut() {
        *v = (*v).max(0);
    }
    decide_field(grid, &counts)
}

const REGRESSION_INTERCEPT: f64 = -0.068;
const REGRESSION_SLOPE: f64 = 0.803;

/// Global linear guess at the true count, clamped to [0, 8] before rounding.
/// Rounding is half-to-even (the original study rounds with numpy).
pub fn corrected_estimate(noised: i32) -> i32 {
    let est = REGRESSION_INTERCEPT + REGRESSION_SLOPE * f64::from(noised);
    est.clamp(0.0, 8.0).round_ties_even() as i32
}

fn step_regression<R: Rng + ?Sized>(
    grid: &Grid,
    noise_level: f64,
    boundary: BoundaryPolicy,
    rng: &mut R,
) -> Grid {
    let mut counts = grid.neighbor_counts(boundary);
    noise::perturb(&mut counts, noise_level, rng);
    for v in counts.values_mut() {
        *v = corrected_estimate(*v);
    }
    decide_field(grid, &counts)
}

// Piecewise fit: (intercept, slope on the noised count, slope on the
// neighbors' noised-count sum), keyed on the noised-count bucket.
const TIER_0: (f64, f64, f64) = (-3.97457252811653e-2, 0.0, 2.63517962151024e-2);
const TIER_1: (f64, f64, f64) = (-0.194932201455905, 0.0, 8.75308708573203e-2);
const TIER_2: (f64, f64, f64) = (1.02854754427366, 0.0, 5.61051757908324e-2);
const TIER_3_5: (f64, f64, f64) = (-0.258180864139362, 0.787647654473264, 3.29954507970766e-2);
const TIER_6_7: (f64, f64, f64) = (-1.79207022505006, 1.07037822552138, 2.18569577000118e-2);

/// Bucketed linear guess at the true count. A noised count outside the
/// fitted buckets (-1 or >= 8 is reachable, the noised field is unclipped)
/// estimates 0, as in the original study. Clamped to [0, 8] before
/// half-to-even rounding.
pub fn tiered_estimate(noised: i32, neighbor_sum: i32) -> i32 {
    let (intercept, count_slope, sum_slope) = match noised {
        0 => TIER_0,
        1 => TIER_1,
        2 => TIER_2,
        3..=5 => TIER_3_5,
        6..=7 => TIER_6_7,
        _ => return 0,
    };
    let est =
        intercept + count_slope * f64::from(noised) + sum_slope * f64::from(neighbor_sum);
    est.clamp(0.0, 8.0).round_ties_even() as i32
}

fn step_tiered_regression<R: Rng + ?Sized>(
    grid: &Grid,
    noise_level: f64,
    boundary: BoundaryPolicy,
    rng: &mut R,
) -> Grid {
    let mut counts = grid.neighbor_counts(boundary);
    noise::perturb(&mut counts, noise_level, rng);
    let sums = counts.neighbor_sums(boundary);
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            *counts.get_mut(row, col) =
                tiered_estimate(counts.get(row, col), sums.get(row, col));
        }
    }
    decide_field(grid, &counts)
}

/// One canonical noisy step used as the lookahead prediction; noised counts
/// are clipped into [0, 8] here, unlike the noisy-standard rule proper.
fn predict_future<R: Rng + ?Sized>(
    grid: &Grid,
    noise_level: f64,
    boundary: BoundaryPolicy,
    rng: &mut R,
) -> Grid {
    let mut counts = grid.neighbor_counts(boundary);
    noise::perturb(&mut counts, noise_level, rng);
    for v in counts.values_mut() {
        *v = (*v).clamp(0, 8);
    }
    decide_field(grid, &counts)
}

fn step_two_step<R: Rng + ?Sized>(
    grid: &Grid,
    noise_level: f64,
    boundary: BoundaryPolicy,
    rng: &mut R,
) -> Grid {
    let future = predict_future(grid, noise_level, boundary, rng);
    let future_counts = future.neighbor_counts(boundary);
    let mut next = Grid::new_dead(grid.rows(), grid.cols());
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let cell = grid.get(row, col);
            let future_cell = future.get(row, col);
            // Predicted live cells in the 3x3 block around this cell next
            // timestep, self included; always in [0, 8].
            let score = future_counts.get(row, col) + i32::from(future_cell);
            let value = if cell == 0 && score == 3 {
                1
            } else if cell == 1 && (2..=3).contains(&score) {
                1
            } else if (4..=6).contains(&score) {
                future_cell
            } else {
                0
            };
            next.set(row, col, value);
        }
    }
    next
}

const DISTRESS_FANOUT: usize = 4;

fn step_distress<R: Rng + ?Sized>(
    grid: &Grid,
    noise_level: f64,
    boundary: BoundaryPolicy,
    rng: &mut R,
) -> Grid {
    let unnoised = grid.neighbor_counts(boundary);
    let mut counts = unnoised.clone();
    noise::perturb(&mut counts, noise_level, rng);
    for v in counts.values_mut() {
        *v = (*v).max(0);
    }

    // Distress fires for live cells that the noised decision would kill even
    // though their unnoised count is exactly 3. The scan runs against the
    // pre-increment field.
    let mut distressed = Vec::new();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let noised = counts.get(row, col);
            if grid.get(row, col) == 1
                && !(2..=3).contains(&noised)
                && unnoised.get(row, col) == 3
            {
                distressed.push((row, col));
            }
        }
    }

    for (row, col) in distressed {
        let neighbors = in_bounds_neighbors(row, col, grid.rows(), grid.cols());
        let amount = neighbors.len().min(DISTRESS_FANOUT);
        for i in index::sample(rng, neighbors.len(), amount) {
            let (nr, nc) = neighbors[i];
            *counts.get_mut(nr, nc) += 1;
        }
    }

    decide_field(grid, &counts)
}
