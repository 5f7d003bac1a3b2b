//! Per-unit result log writer.
//!
//! One log file per analysis unit: every estimator record as one decimal
//! value per line in canonical battery order (`-1.000000` stands for an
//! absent estimate), then the assessed value, then a `----` terminator.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffered writer for one unit's value log.
pub struct UnitLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl UnitLog {
    /// Create `<dir>/<stem>.log`, creating `dir` as needed.
    pub fn create(dir: &Path, stem: &str) -> std::io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{stem}.log"));
        let writer = BufWriter::new(File::create(&path)?);
        Ok(Self { path, writer })
    }

    /// Append one estimator value; absent estimates are logged as -1.
    pub fn record(&mut self, estimate: Option<f64>) -> std::io::Result<()> {
        writeln!(self.writer, "{:.6}", estimate.unwrap_or(-1.0))
    }

    /// Append the assessed value and the unit terminator, then flush.
    pub fn finish(mut self, assessed: f64) -> std::io::Result<PathBuf> {
        writeln!(self.writer, "{assessed:.6}")?;
        writeln!(self.writer, "----")?;
        self.writer.flush()?;
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_is_one_value_per_line() {
        let tmp = tempfile::tempdir().unwrap();
        let mut log = UnitLog::create(tmp.path(), "00001").unwrap();
        log.record(Some(0.987654)).unwrap();
        log.record(None).unwrap();
        let path = log.finish(0.5).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["0.987654", "-1.000000", "0.500000", "----"]);
    }

    #[test]
    fn create_makes_missing_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("results").join("run1");
        let log = UnitLog::create(&dir, "unit").unwrap();
        let path = log.finish(1.0).unwrap();
        assert!(path.exists());
        assert_eq!(path, dir.join("unit.log"));
    }
}
