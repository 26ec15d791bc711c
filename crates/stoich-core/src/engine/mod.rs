//! Módulo del motor de recálculo.
//!
//! Expone la función pura `recalculate` (reglas de despacho por intención),
//! la pasada de rendimiento/exceso y la `TableSession` que orquesta las
//! ediciones con diario append-only.

pub mod recalc;
pub mod session;
pub mod yields;

pub use recalc::{recalculate, recalculate_row};
pub use session::TableSession;
pub use yields::{apply_yield_pass, limiting_reagent_moles, yield_or_excess};

pub use crate::edit::{EditKind, MoleculeEdit, RecordDraft};
pub use crate::journal::{EditLog, InMemoryEditLog, TableEvent, TableEventKind};
