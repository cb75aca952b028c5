pub mod loaders;
pub mod question;
pub mod selection;

pub use loaders::{load_dataset, load_filter_preset, DatasetSource, FilterPreset};
pub use question::{Dataset, Question};
pub use selection::{Facet, MarksFilter, SelectionEvent, SelectionState, SortOrder};
