//! stoich-core: Motor de recálculo estequiométrico
pub mod constants;
pub mod edit;
pub mod engine;
pub mod errors;
pub mod hashing;
pub mod journal;

pub use edit::{EditKind, MoleculeEdit, RecordDraft};
pub use engine::{apply_yield_pass, limiting_reagent_moles, recalculate, recalculate_row, yield_or_excess, TableSession};
pub use errors::EngineError;
pub use hashing::{snapshot_fingerprint, to_canonical_json};
pub use journal::{EditLog, InMemoryEditLog, TableEvent, TableEventKind};
