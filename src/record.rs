//! Measurement records and the append-only CSV result log.
//!
//! Each `Measurement` is one observation of (input size, wall time, LCS
//! result). The log file is reopened in append mode for every row and closed
//! again before the next iteration starts, so a killed process never loses
//! rows that were already reported.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Column names of the result log, in order.
pub const CSV_HEADER: [&str; 3] = ["Input_Size", "Execution_Time_s", "LCS_Result"];

/// One timed LCS run.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Length of each of the two generated inputs.
    pub input_size: usize,
    /// Wall-clock seconds spent inside the LCS engine.
    pub execution_time_s: f64,
    /// The reconstructed common subsequence.
    pub lcs_result: String,
    /// Resident-memory growth observed across the engine call.
    pub rss_delta_kib: u64,
}

impl Measurement {
    /// Number of characters in the LCS result.
    pub fn lcs_len(&self) -> usize {
        self.lcs_result.chars().count()
    }

    /// The three persisted columns; time is fixed at 6 decimal places.
    pub fn csv_row(&self) -> [String; 3] {
        [
            self.input_size.to_string(),
            format!("{:.6}", self.execution_time_s),
            self.lcs_result.clone(),
        ]
    }
}

/// Handle on the CSV result log.
///
/// Holds only the path; no file descriptor stays open between writes.
#[derive(Debug, Clone)]
pub struct CsvLog {
    path: PathBuf,
}

impl CsvLog {
    /// Create (or truncate) the log at `path` and write the header row.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(CSV_HEADER)?;
        writer.flush()?;
        Ok(Self { path })
    }

    /// Append one data row, closing the file before returning.
    pub fn append(&self, m: &Measurement) -> Result<()> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(m.csv_row())?;
        writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(iteration: usize, size: usize, lcs: &str) -> Measurement {
        Measurement {
            iteration,
            input_size: size,
            execution_time_s: 0.000_123_456_7,
            lcs_result: lcs.to_string(),
            rss_delta_kib: 0,
        }
    }

    #[test]
    fn row_formats_time_to_six_places() {
        let row = sample(1, 10, "abc").csv_row();
        assert_eq!(row, ["10".to_string(), "0.000123".to_string(), "abc".to_string()]);
    }

    #[test]
    fn lcs_len_counts_chars() {
        assert_eq!(sample(1, 4, "").lcs_len(), 0);
        assert_eq!(sample(1, 4, "héé").lcs_len(), 3);
    }

    #[test]
    fn header_then_appended_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let log = CsvLog::create(&path).unwrap();
        log.append(&sample(1, 10, "ab")).unwrap();
        log.append(&sample(2, 20, "")).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Input_Size,Execution_Time_s,LCS_Result",
                "10,0.000123,ab",
                "20,0.000123,",
            ]
        );
        assert_eq!(log.path(), path.as_path());
    }

    #[test]
    fn create_truncates_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        std::fs::write(&path, "stale\nrows\n").unwrap();
        CsvLog::create(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Input_Size,Execution_Time_s,LCS_Result\n");
    }

    #[test]
    fn append_without_create_fails() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvLog {
            path: dir.path().join("missing.csv"),
        };
        assert!(log.append(&sample(1, 1, "a")).is_err());
    }
}
