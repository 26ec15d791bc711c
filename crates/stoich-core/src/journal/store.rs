use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

use super::{TableEvent, TableEventKind};

/// Diario de edición append-only.
pub trait EditLog {
    /// Asienta un evento a partir de su kind y devuelve el evento completo
    /// (con seq y ts).
    fn append_kind(&mut self, table_id: Uuid, kind: TableEventKind) -> TableEvent;
    /// Lista los eventos de una tabla (orden ascendente por seq).
    fn list(&self, table_id: Uuid) -> Vec<TableEvent>;
}

/// Diario en memoria, suficiente para sesiones interactivas y tests.
pub struct InMemoryEditLog {
    pub inner: HashMap<Uuid, Vec<TableEvent>>,
}

impl Default for InMemoryEditLog {
    fn default() -> Self {
        Self { inner: HashMap::new() }
    }
}

impl EditLog for InMemoryEditLog {
    fn append_kind(&mut self, table_id: Uuid, kind: TableEventKind) -> TableEvent {
        let vec = self.inner.entry(table_id).or_default();
        let seq = vec.len() as u64;
        let ev = TableEvent { seq,
                              table_id,
                              kind,
                              ts: Utc::now() };
        vec.push(ev.clone());
        ev
    }

    fn list(&self, table_id: Uuid) -> Vec<TableEvent> {
        self.inner.get(&table_id).cloned().unwrap_or_default()
    }
}
