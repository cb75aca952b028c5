pub mod explorer_session;

pub use explorer_session::{ExplorerSession, Recomputed};
