pub mod document_exporter;
pub mod export_grouper;
pub mod facet_index;
pub mod filter_engine;
pub mod result_presenter;
pub mod text_cleaner;

pub use document_exporter::{DocumentExporter, ExportOptions, FilterSummary};
pub use export_grouper::{group, ExportGrouping};
pub use facet_index::{FacetIndex, FacetOptions};
pub use filter_engine::{filter, ResultList};
pub use result_presenter::{present, DisplayRecord, TextSegment};
pub use text_cleaner::TextCleaner;
