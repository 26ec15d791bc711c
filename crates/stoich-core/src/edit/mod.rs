//! Intenciones de edición y su adaptador de grilla.

mod draft;
mod types;

pub use draft::RecordDraft;
pub use types::{EditKind, MoleculeEdit};
