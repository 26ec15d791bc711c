//! Fingerprint de snapshots de la tabla.

use serde::Serialize;

use stoich_domain::{MoleculeRecord, ReactionTable};

use crate::constants::ENGINE_VERSION;
use crate::errors::EngineError;
use crate::hashing::hash::hash_value;

/// Estructura que agrupa los insumos para calcular el fingerprint de un
/// snapshot. NO es el fingerprint final (string hash) sino el modelo previo a
/// canonicalizar.
#[derive(Serialize)]
pub struct SnapshotFingerprintInput<'a> {
    pub engine_version: &'a str,
    pub composition_hash: &'a str,
    pub records: &'a [MoleculeRecord], // en orden de tabla, estado completo
}

/// Fingerprint determinista del estado completo de la tabla: mismo estado,
/// mismo fingerprint, en cualquier ejecución. El id de tabla y la procedencia
/// quedan fuera (son metadatos, no estado recalculable).
pub fn snapshot_fingerprint(table: &ReactionTable) -> Result<String, EngineError> {
    let input = SnapshotFingerprintInput { engine_version: ENGINE_VERSION,
                                           composition_hash: table.composition_hash(),
                                           records: table.records() };
    let value = serde_json::to_value(&input).map_err(|e| EngineError::Internal(e.to_string()))?;
    Ok(hash_value(&value))
}
