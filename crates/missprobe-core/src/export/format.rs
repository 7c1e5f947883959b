//! ExportFormat trait definition

use super::series::Series;

/// Common interface of the series exporters (TSV, JSON, ...)
pub trait ExportFormat {
    /// Header line for the columns, `None` for formats without one
    fn header(&self, columns: &[&str]) -> Option<String>;

    /// Format a single row of the series
    fn format_row(&self, columns: &[&str], row: &[f64]) -> String;

    /// Format a whole series, one row per line
    fn format_series(&self, series: &Series) -> String {
        let mut output = String::new();
        if let Some(header) = self.header(&series.columns) {
            output.push_str(&header);
            output.push('\n');
        }
        for row in &series.rows {
            output.push_str(&self.format_row(&series.columns, row));
            output.push('\n');
        }
        output
    }
}
