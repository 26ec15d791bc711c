//! Tipos de evento del diario de edición y estructura `TableEvent`.
//!
//! Rol en la sesión:
//! - Cada operación de una `TableSession` queda asentada en un `EditLog`
//!   append-only, correlacionada por el id de la tabla.
//! - El diario permite auditar cómo se llegó al snapshot vigente (qué celdas
//!   se tocaron, qué ediciones se rechazaron, cuándo se guardó).
//! - El enum `TableEventKind` es el contrato observable y estable de la
//!   sesión.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::edit::MoleculeEdit;
use crate::errors::EngineError;

/// Tipos de eventos asentados por la sesión.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TableEventKind {
    /// Apertura de sesión sobre una tabla cargada. Invariante: debe ser el
    /// primer evento de un id de tabla.
    TableLoaded {
        composition_hash: String,
        record_count: usize,
        fingerprint: String,
    },
    /// Una edición pasó por el motor y produjo el snapshot con el
    /// `fingerprint` indicado.
    EditApplied { edit: MoleculeEdit, fingerprint: String },
    /// Una edición fue rechazada; el snapshot vigente no cambió.
    EditRejected { record_id: i64, error: EngineError },
    /// Se anexó un reactivo nuevo (id temporal negativo) fuera del motor de
    /// recálculo.
    ReagentAppended {
        record_id: i64,
        name: String,
        fingerprint: String,
    },
    /// La tabla se persistió: ids temporales reemplazados por los del
    /// servidor, revisión incrementada.
    TableSaved {
        revision: u32,
        id_remap: Vec<(i64, i64)>,
        fingerprint: String,
    },
}

impl TableEventKind {
    /// Letra corta de la variante, para trazas compactas de secuencia.
    pub fn variant(&self) -> &'static str {
        match self {
            TableEventKind::TableLoaded { .. } => "L",
            TableEventKind::EditApplied { .. } => "E",
            TableEventKind::EditRejected { .. } => "X",
            TableEventKind::ReagentAppended { .. } => "A",
            TableEventKind::TableSaved { .. } => "S",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableEvent {
    pub seq: u64, // asignado por el EditLog (orden append)
    pub table_id: Uuid,
    pub kind: TableEventKind,
    pub ts: DateTime<Utc>, // metadato (no entra en fingerprints)
}
