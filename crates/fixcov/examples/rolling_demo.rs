//! Demonstration of the fixcov rolling covariance pipeline
//!
//! Walks through each stage on a small synthetic return series:
//! - EWMA weight generation
//! - Diagonal weight matrix construction
//! - Single-window weighted covariance
//! - Rolling covariance across the full series

use fixcov::covariance::{CenteringMode, weighted_covariance_with};
use fixcov::{
    EwmaWindowConfig, Fixed, RollingCovariance, Tensor, diagonalize, exponential_weights,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("==========================================================");
    println!("          fixcov - Rolling EWMA Covariance Demo");
    println!("==========================================================\n");

    // 3 assets over 12 days, returns between -0.2 and 0.2
    let n_periods = 12;
    let n_assets = 3;
    let returns: Vec<Fixed> = (0..n_periods * n_assets)
        .map(|i| {
            let bp = ((i * 37 + 11) % 41) as i32 - 20;
            Fixed::from_raw(bp * 650)
        })
        .collect();
    let returns = Tensor::new(&[n_periods, n_assets], returns)?;
    println!("Sample returns: {} periods x {} assets\n", n_periods, n_assets);

    let config = EwmaWindowConfig {
        decay_percent: 94,
        window: 5,
        centering: CenteringMode::Reference,
    };

    println!("Weights (λ = 0.{}, window = {}):", config.decay_percent, config.window);
    let weights = exponential_weights(config.decay_percent, config.window)?;
    for (i, w) in weights.data().iter().enumerate() {
        println!("  w[{}] = {}", i, w);
    }

    let diagonal = diagonalize(&weights)?;
    println!("\nDiagonal weight matrix shape: {:?}", diagonal.shape());

    let first_block = returns.slice_rows(0, config.window)?;
    for mode in [CenteringMode::Reference, CenteringMode::Columnwise] {
        let cov = weighted_covariance_with(&first_block, &weights, mode)?;
        println!("\nFirst window covariance ({:?} centering):", mode);
        print_matrix(&cov);
    }

    let driver = RollingCovariance::new(config)?;
    let matrices = driver.run(&returns)?;
    println!(
        "\nRolling covariance: {} windows of shape {:?}",
        matrices.len(),
        matrices.first().map(|m| m.shape().to_vec()).unwrap_or_default()
    );
    for (start, cov) in matrices.iter().enumerate() {
        let diag: Vec<String> = (0..n_assets)
            .filter_map(|i| cov.at(&[i, i]))
            .map(|v| format!("{:.6}", v.to_f64()))
            .collect();
        println!("  rows {:>2}..{:>2}  diag = [{}]", start, start + config.window, diag.join(", "));
    }

    println!("\n==========================================================");
    println!("                    Demo Complete!");
    println!("==========================================================");
    Ok(())
}

fn print_matrix(matrix: &Tensor) {
    for row in matrix.as_array().outer_iter() {
        let cells: Vec<String> = row.iter().map(|v| format!("{:>12.8}", v.to_f64())).collect();
        println!("  [{}]", cells.join(" "));
    }
}
