//! JSON report of rolling covariance matrices.

use fixcov::{EwmaWindowConfig, Fixed, Tensor};
use serde::Serialize;

/// Top-level JSON document written to stdout
#[derive(Debug, Serialize)]
pub(crate) struct Report {
    config: EwmaWindowConfig,
    columns: Vec<String>,
    windows: Vec<WindowReport>,
}

/// One covariance matrix and the rows it covers
#[derive(Debug, Serialize)]
struct WindowReport {
    start: usize,
    end: usize,
    covariance: Vec<Vec<Fixed>>,
}

impl Report {
    pub(crate) fn new(config: EwmaWindowConfig, columns: Vec<String>, matrices: &[Tensor]) -> Self {
        let windows = matrices
            .iter()
            .enumerate()
            .map(|(start, matrix)| WindowReport {
                start,
                end: start + config.window,
                covariance: matrix
                    .as_array()
                    .outer_iter()
                    .map(|row| row.iter().copied().collect())
                    .collect(),
            })
            .collect();

        Self {
            config,
            columns,
            windows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixcov::CenteringMode;

    #[test]
    fn test_report_json_shape() {
        let config = EwmaWindowConfig {
            decay_percent: 94,
            window: 3,
            centering: CenteringMode::Columnwise,
        };
        let cov = Tensor::new(
            &[2, 2],
            ["1.5", "-0.25", "-0.25", "2"]
                .iter()
                .map(|v| v.parse().unwrap())
                .collect(),
        )
        .unwrap();
        let report = Report::new(config, vec!["a".into(), "b".into()], &[cov.clone(), cov]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["config"]["centering"], "columnwise");
        assert_eq!(json["columns"][1], "b");
        assert_eq!(json["windows"][1]["start"], 1);
        assert_eq!(json["windows"][1]["end"], 4);
        assert_eq!(json["windows"][0]["covariance"][0][1], "-0.25");
        assert_eq!(json["windows"][0]["covariance"][1][1], "2");
    }
}
