//! Shared helpers for inference integration tests

#![allow(dead_code)]

use aso_inference::AsoConfig;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Seeded normal sample
pub fn normal_sample(seed: u64, n: usize, mean: f64, sd: f64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(mean, sd).unwrap();
    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

/// Small seeded configuration for fast tests
pub fn quick_aso(seed: u64) -> AsoConfig {
    AsoConfig::default()
        .with_num_samples(30)
        .with_iterations(12)
        .with_dt(0.05)
        .with_seed(seed)
}
