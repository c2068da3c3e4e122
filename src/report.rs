use anyhow::{Context, Result};

use std::{
    fmt::Display,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

/// Name of the report file within the results directory.
pub const REPORT_FILE: &str = "SalesResults.txt";

const LABEL_WIDTH: usize = 20;
const TOTAL_WIDTH: usize = 15;
const TIME_WIDTH: usize = 15;
const RULE_WIDTH: usize = 50;

/// Returns the report label for a sales file: its name up to the first `.`.
///
/// # Examples
///
/// ```
/// # use sales_total::label_for;
/// assert_eq!(label_for("salesRecord.json"), "salesRecord");
/// assert_eq!(label_for("TC1.Sales.json"), "TC1");
/// assert_eq!(label_for("data/sales"), "sales");
/// ```
#[must_use]
pub fn label_for(file_name: impl AsRef<Path>) -> String {
    let path = file_name.as_ref();
    let name = path
        .file_name()
        .map_or_else(|| path.to_string_lossy(), |n| n.to_string_lossy());
    name.split('.').next().unwrap_or_default().to_string()
}

/// One line of the sales report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub label: String,
    pub total: f64,
    pub elapsed: Duration,
}

impl Display for ReportRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:<LABEL_WIDTH$}{:<TOTAL_WIDTH$.2}{:<TIME_WIDTH$.4}",
            self.label,
            self.total,
            self.elapsed.as_secs_f64()
        )
    }
}

/// The column titles and rule written at the top of a new report.
#[must_use]
pub fn header() -> String {
    format!(
        "{:<LABEL_WIDTH$}{:<TOTAL_WIDTH$}{:<TIME_WIDTH$}\n{:-<RULE_WIDTH$}\n",
        "Archivo", "Total", "Tiempo (segundos)", ""
    )
}

/// An append-only report of sales totals, kept in a results directory.
///
/// Rows are only ever added to the end of the file. The header is written
/// whenever the file is missing or empty.
#[derive(Debug, Clone)]
pub struct Report {
    path: PathBuf,
}

impl Report {
    /// Creates a report stored as [`REPORT_FILE`] inside `results_dir`.
    ///
    /// Nothing is touched on disk until the first [`Report::append`].
    #[must_use]
    pub fn new(results_dir: impl AsRef<Path>) -> Self {
        Self {
            path: results_dir.as_ref().join(REPORT_FILE),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `row` to the report, returning the report's path.
    ///
    /// # Errors
    ///
    /// Returns errors if the results directory cannot be created, or the
    /// report file cannot be opened or written.
    pub fn append(&self, row: &ReportRow) -> Result<&Path> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let needs_header = fs::metadata(&self.path).map_or(true, |m| m.len() == 0);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        let mut text = String::new();
        if needs_header {
            text.push_str(&header());
        }
        text.push_str(&row.to_string());
        file.write_all(text.as_bytes())
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, total: f64) -> ReportRow {
        ReportRow {
            label: label.into(),
            total,
            elapsed: Duration::from_micros(1500),
        }
    }

    #[test]
    fn label_for_fn_takes_name_before_first_dot() {
        assert_eq!(label_for("salesRecord.json"), "salesRecord");
        assert_eq!(label_for("TC1.Sales.json"), "TC1");
        assert_eq!(label_for("nodot"), "nodot");
        assert_eq!(label_for(".hidden"), "");
    }

    #[test]
    fn header_fn_lays_out_fixed_width_columns() {
        let header = header();
        let lines: Vec<_> = header.lines().collect();
        assert_eq!(
            lines[0],
            "Archivo             Total          Tiempo (segundos)"
        );
        assert_eq!(lines[1], "-".repeat(50));
    }

    #[test]
    fn report_row_formats_total_and_time() {
        assert_eq!(
            row("salesRecord", 10.0).to_string(),
            "salesRecord         10.00          0.0015         \n"
        );
    }

    #[test]
    fn report_row_keeps_long_labels_whole() {
        let text = row("a_very_long_sales_file_label", 0.0).to_string();
        assert!(text.starts_with("a_very_long_sales_file_label0.00"));
    }

    #[test]
    fn append_fn_writes_header_only_once() {
        let dir = tempfile::tempdir().unwrap();
        let report = Report::new(dir.path().join("results"));
        report.append(&row("TC1", 10.0)).unwrap();
        report.append(&row("TC2", 0.0)).unwrap();
        let text = fs::read_to_string(report.path()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Archivo"));
        assert!(lines[2].starts_with("TC1                 10.00"));
        assert!(lines[3].starts_with("TC2                 0.00"));
    }

    #[test]
    fn append_fn_never_changes_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let report = Report::new(dir.path());
        report.append(&row("TC1", 1.5)).unwrap();
        let before = fs::read_to_string(report.path()).unwrap();
        report.append(&row("TC2", 2.5)).unwrap();
        let after = fs::read_to_string(report.path()).unwrap();
        assert!(after.starts_with(&before));
        assert_eq!(after.lines().count(), before.lines().count() + 1);
    }

    #[test]
    fn append_fn_writes_header_to_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let report = Report::new(dir.path());
        fs::write(report.path(), "").unwrap();
        report.append(&row("TC1", 1.0)).unwrap();
        let text = fs::read_to_string(report.path()).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn append_fn_returns_error_when_results_dir_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("results");
        fs::write(&blocker, "not a directory").unwrap();
        let report = Report::new(&blocker);
        assert!(report.append(&row("TC1", 1.0)).is_err());
    }
}
