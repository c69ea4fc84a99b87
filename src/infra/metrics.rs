// ============================================================
// Layer 6 — Progress Table and Metrics Logger
// ============================================================
// Two views of the same per-epoch numbers:
//
//   ProgressTable  → fixed-width rows printed to stdout
//   MetricsLogger  → optional CSV file for plotting later
//
// Example table:
//   # epoch       trn_err    tst_err         lr  trn_time  tst_time
//     0           1.23e-2    1.40e-2    3.00e-4      0.00      0.02
//     1           9.81e-3    1.02e-2    3.00e-4      0.41      0.02
//
// Errors are root-mean-squared, i.e. sqrt of the MSE loss.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

/// One logged row.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochMetrics {
    /// 0 is the evaluation before any training
    pub epoch: usize,

    /// RMSE of the last training batch of the epoch
    pub trn_err: f64,

    /// RMSE on the reader's held-out sample
    pub tst_err: f64,

    /// Learning rate used during this epoch
    pub lr: f64,

    /// Seconds spent in the training pass
    pub trn_time: f64,

    /// Seconds spent evaluating
    pub tst_time: f64,
}

impl EpochMetrics {
    pub fn new(
        epoch:    usize,
        trn_err:  f64,
        tst_err:  f64,
        lr:       f64,
        trn_time: f64,
        tst_time: f64,
    ) -> Self {
        Self { epoch, trn_err, tst_err, lr, trn_time, tst_time }
    }
}

pub struct ProgressTable;

impl ProgressTable {
    pub fn header() -> String {
        format!(
            "# {:<8}  {:>9}  {:>9}  {:>9}  {:>8}  {:>8}",
            "epoch", "trn_err", "tst_err", "lr", "trn_time", "tst_time"
        )
    }

    pub fn row(m: &EpochMetrics) -> String {
        format!(
            "  {:<8}  {:>9.2e}  {:>9.2e}  {:>9.2e}  {:>8.2}  {:>8.2}",
            m.epoch, m.trn_err, m.tst_err, m.lr, m.trn_time, m.tst_time
        )
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Open (or create) the CSV file. The header is written only if the
    /// file is new, so repeated runs append to one log.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let csv_path = path.as_ref().to_path_buf();

        if let Some(parent) = csv_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "epoch,trn_err,tst_err,lr,trn_time,tst_time")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{:.6e},{:.6e},{:.6e},{:.4},{:.4}",
            m.epoch, m.trn_err, m.tst_err, m.lr, m.trn_time, m.tst_time,
        )?;
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_lines_up_with_header() {
        let m = EpochMetrics::new(12, 1.234e-2, 5.0, 3e-4, 0.5, 12.25);
        let row = ProgressTable::row(&m);
        assert_eq!(row.len(), ProgressTable::header().len());
        assert!(row.contains("1.23e-2"));
        assert!(row.contains("3.00e-4"));
        assert!(row.contains("12.25"));
    }

    #[test]
    fn test_csv_header_written_once() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("metrics.csv");

        let logger = MetricsLogger::new(&path).unwrap();
        logger.log(&EpochMetrics::new(0, 1.0, 2.0, 0.1, 0.0, 0.0)).unwrap();
        drop(logger);

        let logger = MetricsLogger::new(&path).unwrap();
        logger.log(&EpochMetrics::new(1, 1.0, 2.0, 0.1, 0.0, 0.0)).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "epoch,trn_err,tst_err,lr,trn_time,tst_time");
        assert!(lines[2].starts_with("1,"));
    }
}
