pub mod dataset_loader;
pub mod preset_loader;

pub use dataset_loader::{load_dataset, parse_dataset, DatasetSource};
pub use preset_loader::{load_filter_preset, parse_filter_preset, FilterPreset};
