//! Sesión de edición sobre una tabla de reacción.
//!
//! `TableSession` orquesta el ciclo de vida que rodea al motor puro:
//! mantiene el snapshot autoritativo, pasa cada edición por `recalculate` y
//! reemplaza el snapshot completo solo si la edición fue aceptada (nunca hay
//! estados intermedios visibles), asienta cada operación en un `EditLog` y
//! administra lo que el motor no cubre: alta de reactivos con id temporal y
//! la transición de guardado (ids de servidor, revisión, bandera dirty).

use log::{debug, warn};
use std::collections::HashMap;
use uuid::Uuid;

use stoich_domain::{MoleculeRecord, ReactionRole, ReactionTable};

use crate::edit::{MoleculeEdit, RecordDraft};
use crate::errors::EngineError;
use crate::hashing::snapshot_fingerprint;
use crate::journal::{EditLog, InMemoryEditLog, TableEvent, TableEventKind};

use super::recalc::recalculate;

/// Sesión interactiva con diario de edición conectable.
pub struct TableSession<L>
    where L: EditLog
{
    edit_log: L,
    table: ReactionTable,
    dirty: bool,
    revision: u32,
}

impl TableSession<InMemoryEditLog> {
    /// Abre una sesión con diario en memoria.
    #[inline]
    pub fn open(table: ReactionTable) -> Result<Self, EngineError> {
        Self::open_with_log(table, InMemoryEditLog::default())
    }
}

impl<L> TableSession<L>
    where L: EditLog
{
    /// Abre una sesión sobre una tabla recién cargada: verifica su
    /// integridad, aplica el limitante por defecto si ninguna especie lleva
    /// la bandera y asienta `TableLoaded`.
    pub fn open_with_log(table: ReactionTable, mut edit_log: L) -> Result<Self, EngineError> {
        table.verify_integrity()?;
        let table = table.with_default_limiting();
        let fingerprint = snapshot_fingerprint(&table)?;
        debug!("table session opened: {} records, snapshot {}", table.len(), &fingerprint[..12]);
        edit_log.append_kind(table.id(),
                             TableEventKind::TableLoaded { composition_hash: table.composition_hash().to_string(),
                                                           record_count: table.len(),
                                                           fingerprint });
        Ok(TableSession { edit_log,
                          table,
                          dirty: false,
                          revision: 0 })
    }

    /// Pasa una intención por el motor. Si la acepta, el snapshot de la
    /// sesión se reemplaza completo y queda asentado `EditApplied`; si la
    /// rechaza, el snapshot no cambia y queda asentado `EditRejected`.
    pub fn apply(&mut self, edit: &MoleculeEdit) -> Result<&ReactionTable, EngineError> {
        match recalculate(&self.table, edit) {
            Ok(next) => {
                let fingerprint = snapshot_fingerprint(&next)?;
                debug!("edit applied: record {} field {} -> snapshot {}",
                       edit.record_id,
                       edit.kind.field(),
                       &fingerprint[..12]);
                self.edit_log.append_kind(next.id(),
                                          TableEventKind::EditApplied { edit: edit.clone(),
                                                                        fingerprint });
                self.table = next;
                self.dirty = true;
                Ok(&self.table)
            }
            Err(error) => {
                warn!("edit rejected: record {} field {}: {}", edit.record_id, edit.kind.field(), error);
                self.edit_log.append_kind(self.table.id(),
                                          TableEventKind::EditRejected { record_id: edit.record_id,
                                                                         error: error.clone() });
                Err(error)
            }
        }
    }

    /// Variante para la grilla: reduce la fila confirmada a su intención y la
    /// aplica. Devuelve `false` si la fila no cambiaba nada (no-op sin
    /// asiento en el diario).
    pub fn apply_row(&mut self, draft: &RecordDraft) -> Result<bool, EngineError> {
        let current = match self.table.get(draft.id) {
            Some(rec) => rec,
            None => {
                let error = EngineError::UnknownRecord(draft.id);
                warn!("row rejected: {}", error);
                self.edit_log.append_kind(self.table.id(),
                                          TableEventKind::EditRejected { record_id: draft.id,
                                                                         error: error.clone() });
                return Err(error);
            }
        };
        match MoleculeEdit::from_draft(current, draft) {
            Ok(Some(edit)) => {
                self.apply(&edit)?;
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(error) => {
                warn!("row rejected: record {}: {}", draft.id, error);
                self.edit_log.append_kind(self.table.id(),
                                          TableEventKind::EditRejected { record_id: draft.id,
                                                                         error: error.clone() });
                Err(error)
            }
        }
    }

    /// Anexa un reactivo nuevo como agente con id temporal negativo y
    /// coeficiente 1. La masa inicial se deriva de los moles planificados del
    /// limitante vigente; sin limitante (o sin masa en él) nace vacía. El
    /// alta es una concatenación, no pasa por el motor de recálculo.
    pub fn append_reagent(&mut self,
                          name: &str,
                          formula: &str,
                          smiles: &str,
                          molecular_weight: f64,
                          structure_ref: i64)
                          -> Result<i64, EngineError> {
        let id = self.table.next_temporary_id();
        let record = MoleculeRecord::new(id, ReactionRole::Agent, name, formula, smiles, molecular_weight, structure_ref)?;
        let scale = self.table
                        .limiting_reagent()
                        .and_then(|l| l.moles().map(|m| m / l.coefficient()));
        let initial_mass = scale.map(|s| record.coefficient() * s * record.molecular_weight());
        let record = record.with_mass(initial_mass)?;

        let next = self.table.append_record(record)?;
        let fingerprint = snapshot_fingerprint(&next)?;
        debug!("reagent appended: {} (id {})", name, id);
        self.edit_log.append_kind(next.id(),
                                  TableEventKind::ReagentAppended { record_id: id,
                                                                    name: name.to_string(),
                                                                    fingerprint });
        self.table = next;
        self.dirty = true;
        Ok(id)
    }

    /// Transición de guardado: reemplaza cada id temporal por el id que
    /// asignó el servidor, incrementa la revisión y limpia la bandera dirty.
    ///
    /// # Errores
    /// `Internal` si algún registro temporal no tiene id asignado en el mapa.
    pub fn mark_saved(&mut self, server_ids: &HashMap<i64, i64>) -> Result<u32, EngineError> {
        let mut id_remap: Vec<(i64, i64)> = Vec::new();
        let mut records = Vec::with_capacity(self.table.len());
        for rec in self.table.records() {
            if rec.is_temporary() {
                let new_id = *server_ids.get(&rec.id())
                                        .ok_or_else(|| EngineError::Internal(format!("missing persisted id for temporary record {}", rec.id())))?;
                id_remap.push((rec.id(), new_id));
                records.push(rec.with_persisted_id(new_id)?);
            } else {
                records.push(rec.clone());
            }
        }
        let next = self.table.with_records(records)?;
        let fingerprint = snapshot_fingerprint(&next)?;
        self.revision += 1;
        debug!("table saved: revision {} ({} temporary id(s) remapped)", self.revision, id_remap.len());
        self.edit_log.append_kind(next.id(),
                                  TableEventKind::TableSaved { revision: self.revision,
                                                               id_remap,
                                                               fingerprint });
        self.table = next;
        self.dirty = false;
        Ok(self.revision)
    }

    // ----- consultas -----

    /// Snapshot autoritativo vigente.
    pub fn table(&self) -> &ReactionTable {
        &self.table
    }

    /// Cede la tabla al llamador y cierra la sesión.
    pub fn into_table(self) -> ReactionTable {
        self.table
    }

    /// `true` si hay cambios sin persistir desde la apertura o el último
    /// guardado.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Revisión persistida más reciente (0 = nunca guardada en esta sesión).
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Id estable de la tabla de la sesión.
    pub fn table_id(&self) -> Uuid {
        self.table.id()
    }

    /// Fingerprint del snapshot vigente.
    pub fn fingerprint(&self) -> Result<String, EngineError> {
        snapshot_fingerprint(&self.table)
    }

    /// Eventos asentados para la tabla de la sesión (orden de asiento).
    pub fn events(&self) -> Vec<TableEvent> {
        self.edit_log.list(self.table.id())
    }

    /// Secuencia compacta de variantes de evento, para asserts y trazas.
    pub fn event_variants(&self) -> Vec<&'static str> {
        self.events().iter().map(|e| e.kind.variant()).collect()
    }
}
