/// Epsilon keeping the coefficient of variation finite when a group's mean
/// population is zero.
pub const CV_EPSILON: f64 = 1e-7;

/// Summary of all trials sharing one (seed pattern, noise level) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateStat {
    pub mean: f64,
    pub std_dev: f64,
    pub cv: f64,
}

/// Mean, population standard deviation (divide by N), and the
/// epsilon-stabilized coefficient of variation.
pub fn summarize(samples: &[f64]) -> AggregateStat {
    if samples.is_empty() {
        return AggregateStat {
            mean: 0.0,
            std_dev: 0.0,
            cv: 0.0,
        };
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();
    AggregateStat {
        mean,
        std_dev,
        cv: std_dev / (mean + CV_EPSILON),
    }
}
