use noisylife::life::rules::RuleVariant;
use noisylife::life::seed::SeedPattern;
use noisylife::life::sweep::trial_seed;
use noisylife::life::trial::{TrialSpec, run_trial};

fn spec_255(rule: RuleVariant, noise_level: f64) -> TrialSpec {
    TrialSpec {
        pattern: SeedPattern::from_id(255).unwrap(),
        rows: 64,
        cols: 64,
        noise_level,
        generations: 256,
        rule,
        boundary: rule.default_boundary(),
    }
}

#[test]
fn pattern_255_noiseless_run_is_reproducible() {
    // End-to-end reference scenario: id 255 (011111111), 64x64, noise 0,
    // 256 generations, standard rule.
    let spec = spec_255(RuleVariant::Standard, 0.0);
    let first = run_trial(&spec, 0).unwrap();
    let second = run_trial(&spec, 0).unwrap();
    assert_eq!(first, second);

    // Without noise the rng seed cannot matter either.
    let other_seed = run_trial(&spec, 1234).unwrap();
    assert_eq!(first, other_seed);
}

#[test]
fn noiseless_noisy_standard_matches_standard() {
    let standard = run_trial(&spec_255(RuleVariant::Standard, 0.0), 0).unwrap();
    let noisy = run_trial(&spec_255(RuleVariant::NoisyStandard, 0.0), 7).unwrap();
    assert_eq!(standard, noisy);
}

#[test]
fn seeded_noisy_trials_are_bit_identical() {
    for rule in [
        RuleVariant::NoisyStandard,
        RuleVariant::RegressionCorrected,
        RuleVariant::TieredRegressionCorrected,
        RuleVariant::TwoStepLookahead,
        RuleVariant::DistressSignal,
    ] {
        let mut spec = spec_255(rule, 0.35);
        spec.generations = 32;
        let seed = trial_seed(42, 255, 3, 17);
        let a = run_trial(&spec, seed).unwrap();
        let b = run_trial(&spec, seed).unwrap();
        assert_eq!(a, b, "{rule:?} diverged under a fixed seed");
    }
}

#[test]
fn different_trial_indices_get_independent_streams() {
    let spec = {
        let mut s = spec_255(RuleVariant::NoisyStandard, 0.5);
        s.generations = 32;
        s
    };
    let results: Vec<u32> = (0..8)
        .map(|trial| run_trial(&spec, trial_seed(42, 255, 0, trial)).unwrap())
        .collect();
    // Not a hard guarantee, but with 50% noise over 32 generations eight
    // identical outcomes would mean the streams are not independent.
    assert!(
        results.iter().any(|&r| r != results[0]),
        "all trials identical: {results:?}"
    );
}
