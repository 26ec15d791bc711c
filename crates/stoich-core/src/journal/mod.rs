//! Diario de edición de la tabla y trait EditLog.

mod store;
mod types;

pub use store::{EditLog, InMemoryEditLog};
pub use types::{TableEvent, TableEventKind};
