//! Raw series exports and the annotated frame timeline.

mod format;
mod json;
mod series;
mod timeline;
mod tsv;

pub use format::ExportFormat;
pub use json::JsonExporter;
pub use series::{Series, SeriesKind};
pub use timeline::Timeline;
pub use tsv::TsvExporter;
