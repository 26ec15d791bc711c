//! Adaptador de filas de grilla a intenciones tipadas.
//!
//! La grilla de la tabla de reacción no conoce `EditKind`: al confirmar una
//! celda envía la fila COMPLETA, con las columnas derivadas (`moles`,
//! `actualMoles`) tal como las mostraba. `RecordDraft` es esa fila y
//! `MoleculeEdit::from_draft` la reduce a exactamente una intención:
//! - campos intrínsecos alterados → error de contrato, nunca se adivina;
//! - una columna derivada que solo refleja el recálculo del cliente (eco
//!   consistente con los gramos enviados) no cuenta como cambio;
//! - cero cambios → `None` (no-op idempotente);
//! - dos o más cambios reales → `MultiFieldEdit`, el llamador revierte.

use serde::{Deserialize, Serialize};

use stoich_domain::{MoleculeRecord, ReactionRole};

use crate::constants::FIELD_DIFF_REL_TOLERANCE;
use crate::errors::EngineError;

use super::types::{EditKind, MoleculeEdit};

/// Fila tal como la confirma la grilla. En los campos intrínsecos, en
/// `coefficient` y en `limitingReagent`, `None` significa "columna no
/// enviada, sin cambio". En las columnas nulas (`mass`, `moles`,
/// `actualAmount`, `actualMoles`, `notes`) no existe esa distinción: `None`
/// es una celda vacía, así que la fila debe traer el valor vigente de las
/// celdas que no se tocaron.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDraft {
    pub id: i64,
    #[serde(default)]
    pub role: Option<ReactionRole>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub smiles: Option<String>,
    #[serde(default)]
    pub molecular_weight: Option<f64>,
    #[serde(default)]
    pub structure_ref: Option<i64>,
    #[serde(default)]
    pub coefficient: Option<f64>,
    #[serde(default)]
    pub mass: Option<f64>,
    #[serde(default)]
    pub moles: Option<f64>,
    #[serde(default)]
    pub actual_amount: Option<f64>,
    #[serde(default)]
    pub actual_moles: Option<f64>,
    #[serde(default)]
    pub limiting_reagent: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RecordDraft {
    /// Fila equivalente a un registro existente, con las columnas derivadas
    /// pobladas como las vería el usuario. Punto de partida para editar una
    /// celda.
    pub fn from_record(record: &MoleculeRecord) -> Self {
        RecordDraft { id: record.id(),
                      role: Some(record.role()),
                      name: Some(record.name().to_string()),
                      formula: Some(record.formula().to_string()),
                      smiles: Some(record.smiles().to_string()),
                      molecular_weight: Some(record.molecular_weight()),
                      structure_ref: Some(record.structure_ref()),
                      coefficient: Some(record.coefficient()),
                      mass: record.mass(),
                      moles: record.moles(),
                      actual_amount: record.actual_amount(),
                      actual_moles: record.actual_moles(),
                      limiting_reagent: Some(record.is_limiting()),
                      notes: record.notes().map(|n| n.to_string()) }
    }
}

// Igualdad numérica con tolerancia: absoluta cerca de cero, relativa después.
// El ruido de redondeo de una columna derivada no debe parecer una edición.
fn nearly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= FIELD_DIFF_REL_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

fn opt_nearly_equal(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => nearly_equal(x, y),
        _ => false,
    }
}

// Una celda de texto vacía equivale a "sin notas".
fn normalize_text(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

// `true` si el par gramos/moles enviado es internamente coherente: la columna
// derivada solo repite lo que implican los gramos.
fn derived_echo(grams: Option<f64>, moles: Option<f64>, molecular_weight: f64) -> bool {
    match (grams, moles) {
        (None, None) => true,
        (Some(g), Some(m)) => nearly_equal(m * molecular_weight, g),
        _ => false,
    }
}

impl MoleculeEdit {
    /// Reduce una fila confirmada a la intención que contiene, comparándola
    /// con el registro vigente.
    ///
    /// Devuelve `Ok(None)` cuando la fila no cambia nada (regla de no-op).
    ///
    /// # Errores
    /// - `IntrinsicModified` si la fila altera identidad química.
    /// - `MultiFieldEdit` si más de un campo editable cambió de verdad.
    pub fn from_draft(current: &MoleculeRecord, draft: &RecordDraft) -> Result<Option<MoleculeEdit>, EngineError> {
        if draft.id != current.id() {
            return Err(EngineError::Internal(format!("draft id {} does not match record id {}", draft.id, current.id())));
        }
        check_intrinsic(current, draft)?;

        let mw = current.molecular_weight();
        let mut changes: Vec<EditKind> = Vec::new();

        // ambos lados normalizados: un snapshot deserializado puede traer una
        // nota en blanco literal que `with_notes` nunca habría guardado
        let current_notes = current.notes().filter(|s| !s.trim().is_empty());
        if normalize_text(&draft.notes) != current_notes {
            changes.push(EditKind::Notes { value: normalize_text(&draft.notes).map(|s| s.to_string()) });
        }

        collect_amount_pair(&mut changes,
                            draft.mass,
                            draft.moles,
                            current.mass(),
                            current.moles(),
                            mw,
                            AmountColumn::Planned);
        collect_amount_pair(&mut changes,
                            draft.actual_amount,
                            draft.actual_moles,
                            current.actual_amount(),
                            current.actual_moles(),
                            mw,
                            AmountColumn::Actual);

        if draft.limiting_reagent == Some(true) && !current.is_limiting() {
            changes.push(EditKind::LimitingReagent);
        }

        if let Some(value) = draft.coefficient {
            if !nearly_equal(value, current.coefficient()) {
                changes.push(EditKind::Coefficient { value });
            }
        }

        match changes.len() {
            0 => Ok(None),
            1 => Ok(Some(MoleculeEdit::new(current.id(), changes.remove(0)))),
            _ => {
                let fields: Vec<&str> = changes.iter().map(|k| k.field()).collect();
                Err(EngineError::MultiFieldEdit(fields.join(", ")))
            }
        }
    }
}

fn check_intrinsic(current: &MoleculeRecord, draft: &RecordDraft) -> Result<(), EngineError> {
    if let Some(role) = draft.role {
        if role != current.role() {
            return Err(EngineError::IntrinsicModified("role".to_string()));
        }
    }
    if let Some(name) = draft.name.as_deref() {
        if name != current.name() {
            return Err(EngineError::IntrinsicModified("name".to_string()));
        }
    }
    if let Some(formula) = draft.formula.as_deref() {
        if formula != current.formula() {
            return Err(EngineError::IntrinsicModified("formula".to_string()));
        }
    }
    if let Some(smiles) = draft.smiles.as_deref() {
        if smiles != current.smiles() {
            return Err(EngineError::IntrinsicModified("smiles".to_string()));
        }
    }
    if let Some(weight) = draft.molecular_weight {
        if !nearly_equal(weight, current.molecular_weight()) {
            return Err(EngineError::IntrinsicModified("molecularWeight".to_string()));
        }
    }
    if let Some(structure_ref) = draft.structure_ref {
        if structure_ref != current.structure_ref() {
            return Err(EngineError::IntrinsicModified("structureRef".to_string()));
        }
    }
    Ok(())
}

enum AmountColumn {
    Planned,
    Actual,
}

// Decide qué cambió en un par gramos/moles. Si cambiaron los dos pero el par
// enviado es coherente, manda la columna de gramos (reglas 2/4); si solo
// cambió la columna derivada, es una edición en moles (reglas 3/5) o un
// vaciado expresado en gramos.
fn collect_amount_pair(changes: &mut Vec<EditKind>,
                       draft_grams: Option<f64>,
                       draft_moles: Option<f64>,
                       current_grams: Option<f64>,
                       current_moles: Option<f64>,
                       molecular_weight: f64,
                       column: AmountColumn) {
    let grams_changed = !opt_nearly_equal(draft_grams, current_grams);
    let moles_changed = !opt_nearly_equal(draft_moles, current_moles);

    match (grams_changed, moles_changed) {
        (false, false) => {}
        (true, false) => changes.push(grams_edit(&column, draft_grams)),
        (false, true) => match draft_moles {
            Some(m) => changes.push(moles_edit(&column, m)),
            None => changes.push(grams_edit(&column, None)),
        },
        (true, true) => {
            if derived_echo(draft_grams, draft_moles, molecular_weight) {
                changes.push(grams_edit(&column, draft_grams));
            } else {
                // two genuinely different values: surfaced as a multi-field edit
                changes.push(grams_edit(&column, draft_grams));
                match draft_moles {
                    Some(m) => changes.push(moles_edit(&column, m)),
                    None => changes.push(grams_edit(&column, None)),
                }
            }
        }
    }
}

fn grams_edit(column: &AmountColumn, grams: Option<f64>) -> EditKind {
    match column {
        AmountColumn::Planned => EditKind::Mass { grams },
        AmountColumn::Actual => EditKind::ActualAmount { grams },
    }
}

fn moles_edit(column: &AmountColumn, moles: f64) -> EditKind {
    match column {
        AmountColumn::Planned => EditKind::Moles { moles },
        AmountColumn::Actual => EditKind::ActualMoles { moles },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn benzene() -> MoleculeRecord {
        MoleculeRecord::new(1, ReactionRole::Reactant, "Benzene", "C6H6", "c1ccccc1", 78.11, 901).unwrap()
                                                                                                  .with_mass(Some(7.811))
                                                                                                  .unwrap()
    }

    #[test]
    fn test_unchanged_row_is_noop() {
        let rec = benzene();
        let draft = RecordDraft::from_record(&rec);
        assert_eq!(MoleculeEdit::from_draft(&rec, &draft).unwrap(), None);
    }

    #[test]
    fn test_mass_cell_edit_with_client_recalc_echo() {
        let rec = benzene();
        let mut draft = RecordDraft::from_record(&rec);
        // the grid recomputed the derived moles column before posting
        draft.mass = Some(15.622);
        draft.moles = Some(15.622 / 78.11);

        let edit = MoleculeEdit::from_draft(&rec, &draft).unwrap().unwrap();
        assert_eq!(edit.kind, EditKind::Mass { grams: Some(15.622) });
    }

    #[test]
    fn test_mass_cell_edit_with_stale_derived_column() {
        let rec = benzene();
        let mut draft = RecordDraft::from_record(&rec);
        // the grid posted the old derived moles untouched
        draft.mass = Some(15.622);

        let edit = MoleculeEdit::from_draft(&rec, &draft).unwrap().unwrap();
        assert_eq!(edit.kind, EditKind::Mass { grams: Some(15.622) });
    }

    #[test]
    fn test_moles_cell_edit_detected_against_derived_value() {
        let rec = benzene();
        let mut draft = RecordDraft::from_record(&rec);
        draft.moles = Some(0.25);

        let edit = MoleculeEdit::from_draft(&rec, &draft).unwrap().unwrap();
        assert_eq!(edit.kind, EditKind::Moles { moles: 0.25 });
    }

    #[test]
    fn test_cleared_moles_cell_becomes_mass_clear() {
        let rec = benzene();
        let mut draft = RecordDraft::from_record(&rec);
        draft.moles = None;

        let edit = MoleculeEdit::from_draft(&rec, &draft).unwrap().unwrap();
        assert_eq!(edit.kind, EditKind::Mass { grams: None });
    }

    #[test]
    fn test_two_real_changes_are_rejected() {
        let rec = benzene();
        let mut draft = RecordDraft::from_record(&rec);
        draft.mass = Some(20.0);
        draft.notes = Some("changed too".to_string());

        match MoleculeEdit::from_draft(&rec, &draft) {
            Err(EngineError::MultiFieldEdit(fields)) => {
                assert!(fields.contains("notes"));
                assert!(fields.contains("mass"));
            }
            other => panic!("expected MultiFieldEdit, got {:?}", other),
        }
    }

    #[test]
    fn test_intrinsic_change_is_contract_error() {
        let rec = benzene();
        let mut draft = RecordDraft::from_record(&rec);
        draft.molecular_weight = Some(80.0);

        assert_eq!(MoleculeEdit::from_draft(&rec, &draft),
                   Err(EngineError::IntrinsicModified("molecularWeight".to_string())));
    }

    #[test]
    fn test_role_change_is_contract_error() {
        let rec = benzene();
        let mut draft = RecordDraft::from_record(&rec);
        draft.role = Some(ReactionRole::Product);

        assert_eq!(MoleculeEdit::from_draft(&rec, &draft),
                   Err(EngineError::IntrinsicModified("role".to_string())));
    }

    #[test]
    fn test_limiting_checkbox_only_fires_on_true() {
        let rec = benzene();
        let mut draft = RecordDraft::from_record(&rec);
        draft.limiting_reagent = Some(true);
        let edit = MoleculeEdit::from_draft(&rec, &draft).unwrap().unwrap();
        assert_eq!(edit.kind, EditKind::LimitingReagent);

        // unticking the box on an already-limiting record is not an intent
        let flagged = rec.with_limiting_reagent(true);
        let mut draft = RecordDraft::from_record(&flagged);
        draft.limiting_reagent = Some(false);
        assert_eq!(MoleculeEdit::from_draft(&flagged, &draft).unwrap(), None);
    }

    #[test]
    fn test_empty_notes_cell_equals_no_notes() {
        let rec = benzene();
        let mut draft = RecordDraft::from_record(&rec);
        draft.notes = Some("   ".to_string());
        assert_eq!(MoleculeEdit::from_draft(&rec, &draft).unwrap(), None);
    }

    #[test]
    fn test_legacy_blank_notes_do_not_fake_an_intent() {
        // a deserialized snapshot can carry a whitespace-only note verbatim
        let mut value = serde_json::to_value(benzene()).unwrap();
        value["notes"] = serde_json::json!("   ");
        let rec: MoleculeRecord = serde_json::from_value(value).unwrap();

        let draft = RecordDraft::from_record(&rec);
        assert_eq!(MoleculeEdit::from_draft(&rec, &draft).unwrap(), None);

        // and a real single-cell edit on that row is one intent, not two
        let mut draft = RecordDraft::from_record(&rec);
        draft.mass = Some(20.0);
        let edit = MoleculeEdit::from_draft(&rec, &draft).unwrap().unwrap();
        assert_eq!(edit.kind, EditKind::Mass { grams: Some(20.0) });
    }
}
