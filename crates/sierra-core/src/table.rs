//! Collated CSV tables
//!
//! Collated tables are `;`-delimited. The header row holds experiment
//! directory names and each following row is one sampling interval.
//! Summary tables for bivariate batches carry a leading column of row
//! names instead.

use crate::error::{SierraError, SierraResult};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Field delimiter of every table
pub const DELIMITER: u8 = b';';

/// Extension appended to a table path for its standard deviations
pub const STDDEV_EXT: &str = "stddev";

/// Companion standard-deviation table of `path`
#[must_use]
pub fn stddev_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(STDDEV_EXT);
    PathBuf::from(name)
}

/// One column per experiment, one row per interval
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollatedTable {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
    source: PathBuf,
}

impl CollatedTable {
    /// Build a table in memory
    ///
    /// # Errors
    /// Returns [`SierraError::MalformedTable`] if a row width differs from the header
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> SierraResult<Self> {
        let table = Self {
            columns,
            rows,
            source: PathBuf::from("<memory>"),
        };
        table.check_shape()?;
        Ok(table)
    }

    fn check_shape(&self) -> SierraResult<()> {
        match self.rows.iter().position(|r| r.len() != self.columns.len()) {
            None => Ok(()),
            Some(i) => Err(SierraError::MalformedTable {
                path: self.source.clone(),
                reason: format!(
                    "row {i} has {} fields, header has {}",
                    self.rows[i].len(),
                    self.columns.len()
                ),
            }),
        }
    }

    /// Read a table, failing with [`SierraError::MissingInput`] if absent
    ///
    /// # Errors
    /// Returns error if the file is missing, unreadable or holds non-numeric cells
    pub fn read(path: &Path) -> SierraResult<Self> {
        if !path.exists() {
            return Err(SierraError::MissingInput {
                path: path.to_path_buf(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .from_path(path)
            .map_err(|e| SierraError::csv(path, e))?;

        let columns = reader
            .headers()
            .map_err(|e| SierraError::csv(path, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| SierraError::csv(path, e))?;
            let row = record
                .iter()
                .map(|cell| {
                    cell.trim().parse::<f64>().map_err(|_| SierraError::MalformedTable {
                        path: path.to_path_buf(),
                        reason: format!("'{cell}' is not a number"),
                    })
                })
                .collect::<SierraResult<Vec<f64>>>()?;
            rows.push(row);
        }

        let table = Self {
            columns,
            rows,
            source: path.to_path_buf(),
        };
        table.check_shape()?;
        tracing::debug!(path = %path.display(), rows = table.rows.len(), "read collated table");
        Ok(table)
    }

    /// Read a table that may legitimately be absent
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read
    pub fn read_optional(path: &Path) -> SierraResult<Option<Self>> {
        match Self::read(path) {
            Ok(table) => Ok(Some(table)),
            Err(SierraError::MissingInput { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write the table, creating parent directories
    ///
    /// # Errors
    /// Returns error if the file cannot be written
    pub fn write(&self, path: &Path) -> SierraResult<()> {
        create_parent(path)?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .from_path(path)
            .map_err(|e| SierraError::csv(path, e))?;

        writer
            .write_record(&self.columns)
            .map_err(|e| SierraError::csv(path, e))?;
        for row in &self.rows {
            writer
                .write_record(row.iter().map(f64::to_string))
                .map_err(|e| SierraError::csv(path, e))?;
        }
        writer.flush().map_err(|e| SierraError::io(path, e))
    }

    /// Column names
    #[inline]
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of intervals
    #[inline]
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Values of one experiment over time
    ///
    /// # Errors
    /// Returns [`SierraError::MissingColumn`] if the experiment is absent
    pub fn column(&self, name: &str) -> SierraResult<Vec<f64>> {
        let idx = self
            .columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| SierraError::MissingColumn {
                path: self.source.clone(),
                column: name.to_string(),
            })?;
        Ok(self.rows.iter().map(|r| r[idx]).collect())
    }

    /// Last value of each named experiment
    ///
    /// # Errors
    /// Returns error if a column is missing or the table has no rows
    pub fn final_values(&self, names: &[String]) -> SierraResult<Vec<f64>> {
        let Some(last) = self.rows.last() else {
            return Err(SierraError::MalformedTable {
                path: self.source.clone(),
                reason: "no rows".to_string(),
            });
        };
        names
            .iter()
            .map(|name| {
                self.columns
                    .iter()
                    .position(|c| c == name)
                    .map(|idx| last[idx])
                    .ok_or_else(|| SierraError::MissingColumn {
                        path: self.source.clone(),
                        column: name.to_string(),
                    })
            })
            .collect()
    }
}

/// Two-dimensional summary of a bivariate batch
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryGrid {
    /// Row names, from the first criterion
    pub row_names: Vec<String>,
    /// Column names, from the second criterion
    pub col_names: Vec<String>,
    /// `values[i][j]` belongs to row `i`, column `j`
    pub values: Vec<Vec<f64>>,
}

impl SummaryGrid {
    /// Write with the row names as the first column
    ///
    /// # Errors
    /// Returns error if the file cannot be written
    pub fn write(&self, path: &Path) -> SierraResult<()> {
        create_parent(path)?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .from_path(path)
            .map_err(|e| SierraError::csv(path, e))?;

        let header = std::iter::once(String::new()).chain(self.col_names.iter().cloned());
        writer
            .write_record(header)
            .map_err(|e| SierraError::csv(path, e))?;
        for (name, row) in self.row_names.iter().zip(&self.values) {
            let record = std::iter::once(name.clone()).chain(row.iter().map(f64::to_string));
            writer
                .write_record(record)
                .map_err(|e| SierraError::csv(path, e))?;
        }
        writer.flush().map_err(|e| SierraError::io(path, e))
    }

    /// Read a grid written by [`Self::write`]
    ///
    /// # Errors
    /// Returns error if the file is missing or malformed
    pub fn read(path: &Path) -> SierraResult<Self> {
        let table = read_raw(path)?;
        let mut records = table.into_iter();
        let header = records.next().ok_or_else(|| SierraError::MalformedTable {
            path: path.to_path_buf(),
            reason: "empty grid".to_string(),
        })?;

        let col_names: Vec<String> = header.into_iter().skip(1).collect();
        let mut row_names = Vec::new();
        let mut values = Vec::new();
        for record in records {
            let mut fields = record.into_iter();
            row_names.push(fields.next().unwrap_or_default());
            let row = fields
                .map(|cell| {
                    cell.parse::<f64>().map_err(|_| SierraError::MalformedTable {
                        path: path.to_path_buf(),
                        reason: format!("'{cell}' is not a number"),
                    })
                })
                .collect::<SierraResult<Vec<f64>>>()?;
            values.push(row);
        }
        Ok(Self {
            row_names,
            col_names,
            values,
        })
    }
}

fn read_raw(path: &Path) -> SierraResult<Vec<Vec<String>>> {
    if !path.exists() {
        return Err(SierraError::MissingInput {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|e| SierraError::io(path, e))?;
    csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(file)
        .records()
        .map(|r| {
            r.map(|rec| rec.iter().map(str::to_string).collect())
                .map_err(|e| SierraError::csv(path, e))
        })
        .collect()
}

fn create_parent(path: &Path) -> SierraResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| SierraError::io(parent, e))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("exp{i}")).collect()
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocks.csv");
        let table =
            CollatedTable::new(names(2), vec![vec![1.0, 2.0], vec![3.5, 4.0]]).unwrap();
        table.write(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("exp0;exp1\n"));

        let back = CollatedTable::read(&path).unwrap();
        assert_eq!(back.columns(), table.columns());
        assert_eq!(back.column("exp0").unwrap(), vec![1.0, 3.5]);
        assert_eq!(back.final_values(&names(2)).unwrap(), vec![3.5, 4.0]);
    }

    #[test]
    fn absent_table_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(matches!(
            CollatedTable::read(&path),
            Err(SierraError::MissingInput { .. })
        ));
        assert_eq!(CollatedTable::read_optional(&path).unwrap(), None);
    }

    #[test]
    fn missing_column_reported() {
        let table = CollatedTable::new(names(1), vec![vec![1.0]]).unwrap();
        let err = table.column("exp7").unwrap_err();
        assert!(matches!(err, SierraError::MissingColumn { ref column, .. } if column == "exp7"));
        assert!(err.is_skippable());
    }

    #[test]
    fn ragged_rows_rejected() {
        assert!(matches!(
            CollatedTable::new(names(2), vec![vec![1.0]]),
            Err(SierraError::MalformedTable { .. })
        ));
    }

    #[test]
    fn non_numeric_cell_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "exp0;exp1\n1;abc\n").unwrap();
        assert!(matches!(
            CollatedTable::read(&path),
            Err(SierraError::MalformedTable { .. })
        ));
    }

    #[test]
    fn stddev_companion() {
        assert_eq!(
            stddev_path(Path::new("/a/pm-blocks-collected.csv")),
            Path::new("/a/pm-blocks-collected.csv.stddev")
        );
    }

    #[test]
    fn grid_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pm").join("grid.csv");
        let grid = SummaryGrid {
            row_names: vec!["c1-exp0".into(), "c1-exp1".into()],
            col_names: vec!["c2-exp0".into()],
            values: vec![vec![1.0], vec![2.0]],
        };
        grid.write(&path).unwrap();
        assert_eq!(SummaryGrid::read(&path).unwrap(), grid);
    }
}
