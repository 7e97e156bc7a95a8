//! Compare several models' scores with ASO and a Bayes factor
//!
//! Run with `RUST_LOG=debug` to see bootstrap progress and derived constants.

use aso_core::TracingProgress;
use aso_inference::{
    AsoConfig, AsoTest, BayesFactorAso, BayesFactorConfig, MultiAso, MultiAsoConfig,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn scores(seed: u64, n: usize, mean: f64, sd: f64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(mean, sd).unwrap();
    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Almost Stochastic Order ===\n");

    let baseline = scores(1, 50, 0.70, 0.05);
    let improved = scores(2, 50, 0.74, 0.05);
    let noisy = scores(3, 50, 0.72, 0.15);

    // 1. Pairwise test
    println!("1. Pairwise test: improved vs baseline");
    let config = AsoConfig::default()
        .with_num_samples(500)
        .with_iterations(500)
        .with_num_jobs(4)
        .with_seed(1234);
    let progress = Arc::new(TracingProgress::new("pairwise", 500, 100));
    let result = AsoTest::new(config.clone())
        .with_observer(progress)
        .run(&improved, &baseline)?;
    println!("  violation ratio: {:.4}", result.violation_ratio);
    println!("  sigma_hat:       {:.4}", result.sigma_hat);
    println!("  epsilon_min:     {:.4}", result.epsilon_min);
    println!(
        "  improved is almost stochastically larger: {}",
        result.is_significant()
    );

    // 2. Multi-model comparison
    println!("\n2. Multi-model comparison (Bonferroni, symmetric)");
    let mut models = BTreeMap::new();
    models.insert("baseline".to_string(), baseline.clone());
    models.insert("improved".to_string(), improved.clone());
    models.insert("noisy".to_string(), noisy);

    let matrix = MultiAso::new(MultiAsoConfig::default().with_aso(config.clone())).run(models)?;
    println!("{matrix}");
    for (i, j) in matrix.significant_pairs(0.5) {
        println!(
            "  {} > {} (epsilon_min {:.4})",
            matrix.labels()[i],
            matrix.labels()[j],
            matrix.get(i, j).unwrap_or(f64::NAN)
        );
    }

    // 3. Bayes factor
    println!("\n3. Bayes factor for H0: eps_W2(improved, baseline) > 0.5");
    let bayes = BayesFactorAso::new(BayesFactorConfig::default().with_bootstrap(config.bootstrap))
        .run(&improved, &baseline)?;
    println!("  BF_01:      {:.4}", bayes.bayes_factor);
    println!("  log BF_01:  {:.4}", bayes.log_bayes_factor());
    println!("  posterior:  {:?}", bayes.posterior);

    Ok(())
}
