//! Pasada de rendimiento/exceso.
//!
//! `actualYield` es una columna derivada: fracción del rendimiento teórico
//! para productos, fracción de exceso sobre el requerimiento estequiométrico
//! para reactivos y agentes no limitantes, y `None` para el propio limitante
//! (no tiene sentido medirlo contra sí mismo). La pasada recalcula la columna
//! completa desde cero en cada snapshot, así es idempotente.

use stoich_domain::{MoleculeRecord, ReactionRole};

/// Moles del limitante que gobiernan la escala real: la cantidad real usada
/// si existe, si no la masa planificada; dividida por su coeficiente.
/// `None` si no hay cantidad que gobierne o si es cero.
pub fn limiting_reagent_moles(limiting: &MoleculeRecord) -> Option<f64> {
    let governing = limiting.actual_amount().or(limiting.mass())?;
    if governing <= 0.0 {
        return None;
    }
    Some((governing / limiting.molecular_weight()) / limiting.coefficient())
}

/// Rendimiento (productos) o exceso (reactivos/agentes) de un registro contra
/// los moles gobernantes del limitante. `None` sin cantidad real propia.
///
/// El exceso puede ser negativo: significa déficit frente al requerimiento
/// estequiométrico, y se reporta tal cual.
pub fn yield_or_excess(record: &MoleculeRecord, limiting_moles: f64) -> Option<f64> {
    let actual = record.actual_amount()?;
    match record.role() {
        ReactionRole::Product => {
            Some(actual / (limiting_moles * record.coefficient() * record.molecular_weight()))
        }
        ReactionRole::Reactant | ReactionRole::Agent => {
            Some((actual / record.molecular_weight()) / record.coefficient() / limiting_moles - 1.0)
        }
    }
}

/// Recalcula `actualYield` en toda la colección. Sin limitante, o sin
/// cantidad gobernante, la columna entera queda en `None`.
pub fn apply_yield_pass(records: &mut [MoleculeRecord]) {
    let limiting_moles = records.iter().find(|r| r.is_limiting()).and_then(limiting_reagent_moles);
    for rec in records.iter_mut() {
        let value = match limiting_moles {
            Some(lm) if !rec.is_limiting() => yield_or_excess(rec, lm),
            _ => None,
        };
        *rec = rec.with_actual_yield(value);
    }
}
