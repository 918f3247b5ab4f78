//! CSV input parsing.
//!
//! Cells are decimal literals parsed straight into fixed point, so no value
//! passes through floating point on the way in.

use crate::error::CliError;
use fixcov::{Fixed, Tensor};
use std::io::Read;
use std::path::Path;

/// Observation matrix read from CSV
#[derive(Debug)]
pub(crate) struct Dataset {
    /// Column names, from the header or generated as `c0`, `c1`, ...
    pub(crate) columns: Vec<String>,
    /// `(rows, columns)` matrix of observations
    pub(crate) values: Tensor,
}

impl Dataset {
    pub(crate) fn rows(&self) -> usize {
        self.values.shape().first().copied().unwrap_or(0)
    }
}

pub(crate) fn read_csv(path: &Path, has_header: bool) -> Result<Dataset, CliError> {
    let file = std::fs::File::open(path)?;
    parse_csv(file, has_header)
}

pub(crate) fn parse_csv<R: Read>(reader: R, has_header: bool) -> Result<Dataset, CliError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_header)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut columns: Vec<String> = if has_header {
        reader.headers()?.iter().map(str::to_string).collect()
    } else {
        Vec::new()
    };

    let mut values = Vec::new();
    let mut rows = 0;
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        for (column, cell) in record.iter().enumerate() {
            let value = cell
                .parse::<Fixed>()
                .map_err(|source| CliError::Cell { row, column, source })?;
            values.push(value);
        }
        if columns.is_empty() {
            columns = (0..record.len()).map(|i| format!("c{i}")).collect();
        }
        rows += 1;
    }

    let values = Tensor::new(&[rows, columns.len()], values)?;
    tracing::debug!(rows, cols = columns.len(), "loaded observations");
    Ok(Dataset { columns, values })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_header() {
        let csv = "spx, ndx\n0.01, -0.02\n0.005, 0.015\n-0.01, 0\n";
        let dataset = parse_csv(csv.as_bytes(), true).unwrap();
        assert_eq!(dataset.columns, vec!["spx", "ndx"]);
        assert_eq!(dataset.rows(), 3);
        assert_eq!(dataset.values.shape(), &[3, 2]);
        assert_eq!(dataset.values.get(1), Some("-0.02".parse().unwrap()));
    }

    #[test]
    fn test_parse_without_header() {
        let csv = "1,2,3\n4,5,6\n";
        let dataset = parse_csv(csv.as_bytes(), false).unwrap();
        assert_eq!(dataset.columns, vec!["c0", "c1", "c2"]);
        assert_eq!(dataset.values.shape(), &[2, 3]);
    }

    #[test]
    fn test_bad_cell_is_located() {
        let csv = "a,b\n1,2\n3,oops\n";
        match parse_csv(csv.as_bytes(), true) {
            Err(CliError::Cell { row, column, .. }) => {
                assert_eq!((row, column), (1, 1));
            }
            other => panic!("expected cell error, got {other:?}"),
        }
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let csv = "a,b\n1,2\n3\n";
        assert!(matches!(
            parse_csv(csv.as_bytes(), true),
            Err(CliError::Csv(_))
        ));
    }

    #[test]
    fn test_header_only() {
        let dataset = parse_csv("a,b\n".as_bytes(), true).unwrap();
        assert_eq!(dataset.values.shape(), &[0, 2]);
        assert_eq!(dataset.rows(), 0);
    }
}
