//! End-to-end scenarios for the ASO entry points

use stochastic_order::prelude::*;
use stochastic_order::{AsoTest, BootstrapConfig, Error};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

fn normal_sample(seed: u64, n: usize, mean: f64, sd: f64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(mean, sd).unwrap();
    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

fn small_config(seed: u64) -> AsoConfig {
    AsoConfig::default()
        .with_num_samples(50)
        .with_iterations(10)
        .with_dt(0.1)
        .with_seed(seed)
}

#[test]
fn test_identical_samples() {
    let a = [1.0, 2.0, 3.0, 4.0, 5.0];

    let result = AsoTest::new(small_config(0).with_confidence_level(0.95))
        .run(&a, &a)
        .unwrap();
    assert_eq!(result.violation_ratio, 0.0);
    assert_eq!(result.epsilon_min, 0.0);

    // At the default level the bound only widens upwards from zero
    let default_level = aso(&a, &a, &small_config(0)).unwrap();
    assert!((0.0..=1.0).contains(&default_level));
}

#[test]
fn test_fully_separated_samples() {
    let a = vec![0.0; 100];
    let b = vec![10.0; 100];

    for level in [0.001, 0.05, 0.5, 0.999, 1.0] {
        let config = AsoConfig::default()
            .with_iterations(50)
            .with_seed(1)
            .with_confidence_level(level);
        let result = AsoTest::new(config).run(&a, &b).unwrap();
        assert_eq!(result.violation_ratio, 1.0);
        assert_eq!(result.sigma_hat, 0.0);
        assert_eq!(result.epsilon_min, 1.0);
    }
}

#[test]
fn test_reproducible_across_workers() {
    let a = normal_sample(1, 80, 0.0, 1.0);
    let b = normal_sample(2, 80, 0.1, 1.2);
    let config = AsoConfig::default()
        .with_num_samples(200)
        .with_iterations(100)
        .with_seed(42);

    let one = aso(&a, &b, &config.clone().with_num_jobs(1)).unwrap();
    let four = aso(&a, &b, &config.with_num_jobs(4)).unwrap();
    assert_eq!(one.to_bits(), four.to_bits());
}

#[test]
fn test_better_model_is_detected() {
    let better = normal_sample(10, 100, 1.0, 0.5);
    let worse = normal_sample(11, 100, 0.0, 0.5);
    let config = AsoConfig::default()
        .with_num_samples(500)
        .with_iterations(200)
        .with_num_jobs(2)
        .with_seed(3);

    let forward = aso(&better, &worse, &config).unwrap();
    let backward = aso(&worse, &better, &config).unwrap();
    assert!(forward < 0.2, "forward bound {forward}");
    assert!(backward > 0.8, "backward bound {backward}");
}

#[test]
fn test_multi_model_without_symmetry() {
    let scores = vec![
        ("low".to_string(), normal_sample(20, 60, 0.0, 0.3)),
        ("mid".to_string(), normal_sample(21, 60, 1.0, 0.3)),
        ("high".to_string(), normal_sample(22, 60, 2.0, 0.3)),
    ];
    let config = MultiAsoConfig::default()
        .with_symmetry(false)
        .with_aso(
            AsoConfig::default()
                .with_num_samples(200)
                .with_iterations(50)
                .with_dt(0.01)
                .with_seed(5),
        );

    let matrix = multi_aso(scores, &config).unwrap();
    assert_eq!(matrix.labels(), &["low", "mid", "high"]);

    for (better, worse) in [("mid", "low"), ("high", "low"), ("high", "mid")] {
        let forward = matrix.get_by_label(better, worse).unwrap();
        let backward = matrix.get_by_label(worse, better).unwrap();
        assert!(forward < 0.5, "{better} vs {worse}: {forward}");
        assert!(backward > 0.5, "{worse} vs {better}: {backward}");
    }
    for i in 0..3 {
        assert_eq!(matrix.get(i, i), Some(0.0));
    }
}

#[test]
fn test_bayes_factor_entry_point() {
    let a = normal_sample(30, 40, 0.5, 0.2);
    let b = normal_sample(31, 40, 0.45, 0.2);
    let config = BayesFactorConfig::default().with_bootstrap(
        BootstrapConfig::default()
            .with_num_samples(100)
            .with_iterations(50)
            .with_seed(9),
    );

    let bf = bf_aso(&a, &b, &config).unwrap();
    assert!(bf.is_finite() && bf > 0.0);
    assert_eq!(bf, bf_aso(&a, &b, &config).unwrap());
}

#[test]
fn test_validation_errors() {
    let config = small_config(0);
    assert!(matches!(
        aso(&[], &[1.0], &config),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        aso(&[1.0], &[2.0], &config.clone().with_num_jobs(0)),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        aso(&[1.0], &[2.0], &config.clone().with_confidence_level(0.0)),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        multi_aso(vec![vec![1.0]], &MultiAsoConfig::default()),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        bf_aso(&[1.0], &[], &BayesFactorConfig::default()),
        Err(Error::InvalidArgument(_))
    ));
}
