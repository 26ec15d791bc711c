//! Intenciones de edición sobre la tabla de reacción.
//!
//! Rol en el motor:
//! - Cada recálculo recibe exactamente UNA intención tipada: qué campo cambia
//!   y con qué valor. El despacho sobre `EditKind` es exhaustivo, así el
//!   compilador garantiza que ninguna regla quede sin rama.
//! - `moles` y `actualMoles` existen SOLO como intención: la grilla los
//!   muestra derivados y el usuario puede teclearlos, pero el snapshot nunca
//!   los persiste. El motor los convierte a gramos en el despacho.
//! - Los campos intrínsecos (nombre, fórmula, smiles, peso molecular, rol,
//!   referencia estructural) no tienen variante: no son editables por
//!   construcción.

use serde::{Deserialize, Serialize};

/// Campo editado y valor propuesto. `None` en los campos nulos significa
/// "vaciar la celda" (estado 'aún no conocido'), nunca cero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "camelCase")]
pub enum EditKind {
    /// Texto libre del registro; no interactúa con ningún otro campo.
    Notes { value: Option<String> },
    /// Gramos planificados. Sobre el reactivo limitante redefine la escala
    /// molar de toda la tabla; sobre cualquier otro registro solo lo toca a
    /// él.
    Mass { grams: Option<f64> },
    /// Moles planificados tecleados en la columna derivada. Se convierte a
    /// una edición de masa (`moles * molecularWeight`) del mismo registro.
    Moles { moles: f64 },
    /// Gramos realmente usados/obtenidos. Independiente por registro, sin
    /// propagación.
    ActualAmount { grams: Option<f64> },
    /// Moles reales tecleados en la columna derivada. Se convierte a una
    /// edición de `actualAmount` del mismo registro.
    ActualMoles { moles: f64 },
    /// Designa el registro editado como reactivo limitante y renormaliza los
    /// coeficientes de toda la tabla.
    LimitingReagent,
    /// Nuevo coeficiente estequiométrico; conserva la relación molar escalando
    /// la masa del registro y luego renormaliza contra el limitante vigente.
    Coefficient { value: f64 },
}

impl EditKind {
    /// Nombre de columna (forma de la grilla) del campo editado. Coincide con
    /// el tag serializado de la variante.
    pub fn field(&self) -> &'static str {
        match self {
            EditKind::Notes { .. } => "notes",
            EditKind::Mass { .. } => "mass",
            EditKind::Moles { .. } => "moles",
            EditKind::ActualAmount { .. } => "actualAmount",
            EditKind::ActualMoles { .. } => "actualMoles",
            EditKind::LimitingReagent => "limitingReagent",
            EditKind::Coefficient { .. } => "coefficient",
        }
    }
}

/// Una edición dirigida: el registro objetivo más la intención.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeEdit {
    pub record_id: i64,
    pub kind: EditKind,
}

impl MoleculeEdit {
    pub fn new(record_id: i64, kind: EditKind) -> Self {
        MoleculeEdit { record_id, kind }
    }
}
