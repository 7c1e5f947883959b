//! TSV export format implementation

use super::format::ExportFormat;

/// TSV (Tab-Separated Values) exporter
#[derive(Debug, Clone, Copy, Default)]
pub struct TsvExporter;

impl ExportFormat for TsvExporter {
    fn header(&self, columns: &[&str]) -> Option<String> {
        Some(columns.join("\t"))
    }

    fn format_row(&self, _columns: &[&str], row: &[f64]) -> String {
        row.iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join("\t")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{Series, SeriesKind};

    #[test]
    fn test_series_with_header() {
        let series = Series {
            kind: SeriesKind::HitErrors,
            columns: vec!["time", "error"],
            rows: vec![vec![1000.0, -4.0], vec![2010.0, 10.5]],
        };
        assert_eq!(
            TsvExporter.format_series(&series),
            "time\terror\n1000\t-4\n2010\t10.5\n"
        );
    }

    #[test]
    fn test_empty_series_keeps_header() {
        let series = Series {
            kind: SeriesKind::Perfectness,
            columns: vec!["time", "perfectness"],
            rows: Vec::new(),
        };
        assert_eq!(TsvExporter.format_series(&series), "time\tperfectness\n");
    }
}
