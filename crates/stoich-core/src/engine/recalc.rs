//! Reglas de recálculo de la tabla de reacción.
//!
//! `recalculate` es una función pura: recibe el snapshot vigente más UNA
//! intención de edición y devuelve un snapshot nuevo, completo y coherente.
//! Nunca muta sus entradas y no toca estado ambiente.
//!
//! Despacho por intención:
//! - `Notes` → solo cambia el texto del registro.
//! - `Mass` sobre el limitante → su masa redefine la escala molar y TODAS las
//!   masas se rederivan de ella; sobre otro registro → cambio local.
//! - `Moles` → se convierte a gramos (`moles * molecularWeight`) y sigue la
//!   misma bifurcación que `Mass`.
//! - `ActualAmount` / `ActualMoles` → cambio local, sin propagación.
//! - `LimitingReagent` → la bandera se muda al registro editado y los
//!   coeficientes se renormalizan dividiendo por su coeficiente previo.
//! - `Coefficient` → la masa del registro sigue a su coeficiente (escala
//!   `nuevo/viejo`) y luego toda la tabla se renormaliza contra el limitante
//!   vigente.
//!
//! Tras cada regla corre la pasada de rendimiento/exceso; es idempotente y
//! barata, así el snapshot resultante siempre tiene `actualYield` coherente.

use stoich_domain::{MoleculeRecord, ReactionTable};

use crate::edit::{EditKind, MoleculeEdit, RecordDraft};
use crate::errors::EngineError;

use super::yields::apply_yield_pass;

/// Aplica una intención de edición y devuelve el snapshot sucesor.
///
/// # Errores
/// `UnknownRecord` si el id no está en la tabla; los errores de guarda de
/// cada regla (`NegativeValue`, `NonFiniteValue`, `NonPositiveCoefficient`,
/// `LimitingMustBeReactant`, `MissingLimitingReagent`) se devuelven sin
/// tocar la tabla.
pub fn recalculate(table: &ReactionTable, edit: &MoleculeEdit) -> Result<ReactionTable, EngineError> {
    let position = table.position(edit.record_id)
                        .ok_or(EngineError::UnknownRecord(edit.record_id))?;
    let mut records: Vec<MoleculeRecord> = table.records().to_vec();

    match &edit.kind {
        EditKind::Notes { value } => {
            records[position] = records[position].with_notes(value.clone());
        }
        EditKind::Mass { grams } => {
            apply_mass(&mut records, position, check_amount("mass", *grams)?)?;
        }
        EditKind::Moles { moles } => {
            let moles = check_value("moles", *moles)?;
            let grams = records[position].mass_for_moles(moles);
            apply_mass(&mut records, position, grams)?;
        }
        EditKind::ActualAmount { grams } => {
            let grams = check_amount("actualAmount", *grams)?;
            records[position] = records[position].with_actual_amount(grams)?;
        }
        EditKind::ActualMoles { moles } => {
            let moles = check_value("actualMoles", *moles)?;
            let grams = records[position].mass_for_moles(moles);
            records[position] = records[position].with_actual_amount(grams)?;
        }
        EditKind::LimitingReagent => {
            apply_limiting(&mut records, position)?;
        }
        EditKind::Coefficient { value } => {
            apply_coefficient(&mut records, position, *value)?;
        }
    }

    apply_yield_pass(&mut records);
    Ok(table.with_records(records)?)
}

/// Variante de conveniencia para llamadores que trabajan con filas de grilla:
/// reduce la fila a su intención y recalcula. Devuelve también la intención
/// detectada (`None` = la fila no cambiaba nada).
pub fn recalculate_row(table: &ReactionTable, draft: &RecordDraft) -> Result<(ReactionTable, Option<MoleculeEdit>), EngineError> {
    let current = table.get(draft.id).ok_or(EngineError::UnknownRecord(draft.id))?;
    match MoleculeEdit::from_draft(current, draft)? {
        Some(edit) => {
            let next = recalculate(table, &edit)?;
            Ok((next, Some(edit)))
        }
        None => Ok((table.clone(), None)),
    }
}

fn check_value(field: &str, value: f64) -> Result<f64, EngineError> {
    if !value.is_finite() {
        return Err(EngineError::NonFiniteValue { field: field.to_string() });
    }
    if value < 0.0 {
        return Err(EngineError::NegativeValue { field: field.to_string(),
                                                value });
    }
    Ok(value)
}

fn check_amount(field: &str, value: Option<f64>) -> Result<Option<f64>, EngineError> {
    value.map(|v| check_value(field, v)).transpose()
}

// Regla de masa. Sobre el limitante: `limitingMoles = grams / mw` define la
// escala y cada registro recibe `coefficient * (limitingMoles / coefLim) *
// mw`; la masa del limitante queda exactamente como se tecleó. Vaciar la masa
// del limitante deja sin escala a la tabla: todas las masas vuelven a
// desconocidas. Sobre un registro no limitante el cambio es local.
fn apply_mass(records: &mut [MoleculeRecord], position: usize, grams: Option<f64>) -> Result<(), EngineError> {
    if !records[position].is_limiting() {
        records[position] = records[position].with_mass(grams)?;
        return Ok(());
    }
    match grams {
        Some(g) => {
            let molecular_weight = records[position].molecular_weight();
            let limiting_coefficient = records[position].coefficient();
            let scale = (g / molecular_weight) / limiting_coefficient;
            for (i, rec) in records.iter_mut().enumerate() {
                let mass = if i == position {
                    g
                } else {
                    rec.coefficient() * scale * rec.molecular_weight()
                };
                *rec = rec.with_mass(Some(mass))?;
            }
        }
        None => {
            for rec in records.iter_mut() {
                *rec = rec.with_mass(None)?;
            }
        }
    }
    Ok(())
}

// Regla de limitante: la bandera se muda al registro editado y todos los
// coeficientes se dividen por su coeficiente previo, de modo que el nuevo
// limitante termina exactamente en 1 y el resto conserva la proporción.
fn apply_limiting(records: &mut [MoleculeRecord], position: usize) -> Result<(), EngineError> {
    if !records[position].role().can_be_limiting() {
        return Err(EngineError::LimitingMustBeReactant);
    }
    let previous_coefficient = records[position].coefficient();
    for (i, rec) in records.iter_mut().enumerate() {
        let flagged = rec.with_limiting_reagent(i == position);
        *rec = flagged.with_coefficient(flagged.coefficient() / previous_coefficient)?;
    }
    Ok(())
}

// Regla de coeficiente: la masa del registro conserva su relación molar con
// la escala vigente (escala `nuevo/viejo`), se aplica el coeficiente nuevo y
// después la tabla entera se renormaliza contra el limitante actual.
fn apply_coefficient(records: &mut [MoleculeRecord], position: usize, value: f64) -> Result<(), EngineError> {
    if !value.is_finite() {
        return Err(EngineError::NonFiniteValue { field: "coefficient".to_string() });
    }
    if value <= 0.0 {
        return Err(EngineError::NonPositiveCoefficient(value));
    }

    let previous = records[position].coefficient();
    let scaled_mass = records[position].mass().map(|g| g * value / previous);
    records[position] = records[position].with_mass(scaled_mass)?.with_coefficient(value)?;

    let limiting_coefficient = records.iter()
                                      .find(|r| r.is_limiting())
                                      .map(|r| r.coefficient())
                                      .ok_or(EngineError::MissingLimitingReagent)?;
    for rec in records.iter_mut() {
        *rec = rec.with_coefficient(rec.coefficient() / limiting_coefficient)?;
    }
    Ok(())
}
