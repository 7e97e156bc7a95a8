//! Score collection representations and configuration round-trips

use std::collections::HashMap;
use stochastic_order::prelude::*;
use stochastic_order::{ConverterRegistry, Error, ScoreTensor};

/// Row-major scores of three clearly ordered models
fn matrix_rows() -> Vec<f64> {
    vec![
        0.10, 0.12, 0.14, 0.16, //
        0.50, 0.52, 0.54, 0.56, //
        0.90, 0.92, 0.94, 0.96,
    ]
}

fn quick() -> MultiAsoConfig {
    MultiAsoConfig::default().with_aso(
        AsoConfig::default()
            .with_num_samples(20)
            .with_iterations(10)
            .with_dt(0.05)
            .with_seed(1),
    )
}

#[test]
fn test_tensor_and_nested_vectors_agree() {
    let tensor = ScoreTensor::new(matrix_rows(), vec![3, 4]).unwrap();
    let nested: Vec<Vec<f64>> = matrix_rows().chunks(4).map(<[f64]>::to_vec).collect();

    let from_tensor = multi_aso(tensor, &quick()).unwrap();
    let from_nested = multi_aso(nested, &quick()).unwrap();

    assert_eq!(from_tensor, from_nested);
    assert_eq!(from_tensor.labels(), &["0", "1", "2"]);
    // Row 2 dominates row 0 completely
    assert_eq!(from_tensor.get(2, 0), Some(0.0));
    assert_eq!(from_tensor.get(0, 2), Some(1.0));
}

#[test]
fn test_hash_map_is_ordered_by_label() {
    let mut scores = HashMap::new();
    scores.insert("b-model".to_string(), vec![0.5, 0.6, 0.7]);
    scores.insert("a-model".to_string(), vec![0.1, 0.2, 0.3]);

    let matrix = multi_aso(scores, &quick()).unwrap();
    assert_eq!(matrix.labels(), &["a-model", "b-model"]);
    assert_eq!(matrix.get_by_label("b-model", "a-model"), Some(0.0));

    let dense = matrix.to_dmatrix();
    assert_eq!(dense.nrows(), 2);
    assert_eq!(dense[(0, 1)], 1.0);
}

#[test]
fn test_registry_rejects_unknown_types() {
    let registry = ConverterRegistry::default();
    let unsupported: Vec<i32> = vec![1, 2, 3];
    assert!(matches!(
        registry.convert(&unsupported),
        Err(Error::UnsupportedType(_))
    ));

    let rows: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
    let collection = registry.convert(&rows).unwrap();
    assert_eq!(collection.len(), 2);
}

#[test]
fn test_config_json() {
    let config: MultiAsoConfig = serde_json::from_str(
        r#"{
            "aso": {
                "confidence_level": 0.1,
                "bootstrap": { "num_samples": 200, "num_jobs": 2, "seed": 7 }
            },
            "use_symmetry": false
        }"#,
    )
    .unwrap();

    assert_eq!(config.aso.confidence_level, 0.1);
    assert_eq!(config.aso.bootstrap.num_samples, 200);
    assert_eq!(config.aso.bootstrap.num_bootstrap_iterations, 1000);
    assert_eq!(config.aso.bootstrap.seed, Some(7));
    assert!(config.use_bonferroni);
    assert!(!config.use_symmetry);

    let bayes: BayesFactorConfig =
        serde_json::from_str(r#"{"prior": {"loc": 0.4, "scale": 1.0, "alpha": 2.0, "beta": 0.5}}"#)
            .unwrap();
    assert_eq!(bayes.eps_min_threshold, 0.5);
    assert_eq!(bayes.prior.alpha, 2.0);
}

#[test]
fn test_matrix_serializes_with_labels() {
    let matrix = multi_aso(vec![vec![0.1, 0.2], vec![0.8, 0.9]], &quick()).unwrap();
    let json = serde_json::to_value(&matrix).unwrap();

    assert_eq!(json["labels"], serde_json::json!(["0", "1"]));
    assert_eq!(json["values"][1][0], serde_json::json!(0.0));
}
