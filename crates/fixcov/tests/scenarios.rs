//! End-to-end tests for weight generation, diagonalization and rolling covariance.

use approx::assert_abs_diff_eq;
use fixcov::covariance::{CenteringMode, weighted_covariance_with};
use fixcov::{
    CovarianceError, EwmaWindowConfig, Fixed, RollingCovariance, Tensor, diagonalize,
    exponential_weights, rolling_covariance, weighted_covariance,
};
use rstest::rstest;

fn matrix(rows: usize, cols: usize, values: &[&str]) -> Tensor {
    let data = values.iter().map(|v| v.parse::<Fixed>().unwrap()).collect();
    Tensor::new(&[rows, cols], data).unwrap()
}

fn returns_5x2() -> Tensor {
    matrix(
        5,
        2,
        &[
            "0.012", "-0.004", "-0.008", "0.010", "0.015", "0.002", "-0.003", "-0.011", "0.007",
            "0.006",
        ],
    )
}

#[test]
fn test_weights_for_lambda_94() {
    let weights = exponential_weights(94, 3).unwrap().to_f64();
    let expected = [0.0600, 0.0564, 0.0530];
    for (w, e) in weights.iter().zip(expected) {
        assert_abs_diff_eq!(*w, e, epsilon = 1e-3);
    }
}

#[test]
fn test_diagonalize_vector() {
    let v = Tensor::new(&[2], vec!["2.0".parse().unwrap(), "3.0".parse().unwrap()]).unwrap();
    let d = diagonalize(&v).unwrap();
    assert_eq!(d.shape(), &[2, 2]);
    let values: Vec<f64> = d.data().iter().map(|x| x.to_f64()).collect();
    assert_eq!(values, vec![2.0, 0.0, 0.0, 3.0]);
}

#[rstest]
#[case(0)]
#[case(50)]
#[case(94)]
#[case(99)]
fn test_three_windows_over_five_rows(#[case] decay: u32) {
    let matrices = rolling_covariance(&returns_5x2(), decay, 3);
    // λ = 0 puts all weight on one row, so Σw - 1 = 0
    if decay == 0 {
        assert!(matches!(matrices, Err(CovarianceError::Arithmetic(_))));
        return;
    }
    let matrices = matrices.unwrap();
    assert_eq!(matrices.len(), 3);
    assert!(matrices.iter().all(|m| m.shape() == [2, 2]));
}

#[rstest]
#[case(5, 1)]
#[case(5, 5)]
#[case(12, 4)]
fn test_window_count(#[case] rows: usize, #[case] window: usize) {
    let data = Tensor::new(&[rows, 2], vec![Fixed::from_raw(100); rows * 2]).unwrap();
    let matrices = rolling_covariance(&data, 94, window).unwrap();
    assert_eq!(matrices.len(), rows - window + 1);
}

#[test]
fn test_window_too_wide_is_an_error() {
    let err = rolling_covariance(&returns_5x2(), 94, 6).unwrap_err();
    assert_eq!(err, CovarianceError::InvalidWindow { window: 6, rows: 5 });
}

#[test]
fn test_equal_weights_give_sample_covariance() {
    let data = matrix(4, 2, &["1", "2", "2", "4", "3", "5", "4", "9"]);
    let weights = Tensor::new(&[4], vec![Fixed::ONE; 4]).unwrap();
    let cov = weighted_covariance_with(&data, &weights, CenteringMode::Columnwise)
        .unwrap()
        .to_f64();

    // Bessel-corrected sample covariance: [[5/3, 11/3], [11/3, 26/3]]
    assert_abs_diff_eq!(cov[[0, 0]], 5.0 / 3.0, epsilon = 1e-4);
    assert_abs_diff_eq!(cov[[0, 1]], 11.0 / 3.0, epsilon = 1e-4);
    assert_abs_diff_eq!(cov[[1, 0]], 11.0 / 3.0, epsilon = 1e-4);
    assert_abs_diff_eq!(cov[[1, 1]], 26.0 / 3.0, epsilon = 1e-4);
}

#[test]
fn test_mismatched_weights() {
    let weights = exponential_weights(94, 4).unwrap();
    assert!(matches!(
        weighted_covariance(&returns_5x2(), &weights),
        Err(CovarianceError::DimensionMismatch {
            expected: 4,
            actual: 5
        })
    ));
}

#[test]
fn test_bit_identical_reruns() {
    let driver = RollingCovariance::new(EwmaWindowConfig {
        decay_percent: 97,
        window: 4,
        centering: CenteringMode::Columnwise,
    })
    .unwrap();
    let data = returns_5x2();
    assert_eq!(driver.run(&data).unwrap(), driver.run(&data).unwrap());
}

#[test]
fn test_config_from_json() {
    let config: EwmaWindowConfig =
        serde_json::from_str(r#"{"decay_percent": 97, "window": 60}"#).unwrap();
    assert_eq!(config.decay_percent, 97);
    assert_eq!(config.window, 60);
    assert_eq!(config.centering, CenteringMode::Reference);

    let config: EwmaWindowConfig = serde_json::from_str(
        r#"{"decay_percent": 90, "window": 10, "centering": "columnwise"}"#,
    )
    .unwrap();
    assert_eq!(config.centering, CenteringMode::Columnwise);
}
