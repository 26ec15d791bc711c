use approx::assert_relative_eq;
use serde_json::json;
use stoich_core::{limiting_reagent_moles, recalculate, EditKind, MoleculeEdit};
use stoich_domain::{MoleculeRecord, ReactionRole, ReactionTable};

// Benzene limiting, Cyclopentadiene second reactant, Cyclohexane product
fn diels_alder_table() -> ReactionTable {
    let records = vec![MoleculeRecord::new(1, ReactionRole::Reactant, "Benzene", "C6H6", "c1ccccc1", 78.11, 901).unwrap()
                                                                                                                .with_limiting_reagent(true),
                       MoleculeRecord::new(2, ReactionRole::Reactant, "Cyclopentadiene", "C5H6", "C1C=CC=C1", 66.1, 902).unwrap(),
                       MoleculeRecord::new(3, ReactionRole::Product, "Cyclohexane", "C6H12", "C1CCCCC1", 84.16, 903).unwrap(),];
    ReactionTable::new(records, json!({"source": "yield-tests"})).unwrap()
}

#[test]
fn end_to_end_yield_and_excess() {
    let table = diels_alder_table();

    // the limiting reagent's actual amount fixes the real molar scale
    let step1 = recalculate(&table, &MoleculeEdit::new(1, EditKind::ActualAmount { grams: Some(70.3) })).unwrap();
    let limiting_moles = 70.3 / 78.11;
    assert_relative_eq!(limiting_reagent_moles(step1.get(1).unwrap()).unwrap(),
                        limiting_moles,
                        max_relative = 1e-12);

    // no other record has an actual amount yet, so the column stays empty
    assert_eq!(step1.get(1).unwrap().actual_yield(), None);
    assert_eq!(step1.get(2).unwrap().actual_yield(), None);
    assert_eq!(step1.get(3).unwrap().actual_yield(), None);

    // a stoichiometrically matched reactant shows zero excess
    let matched_grams = limiting_moles * 66.1;
    let step2 = recalculate(&step1,
                            &MoleculeEdit::new(2, EditKind::ActualAmount { grams: Some(matched_grams) })).unwrap();
    assert_relative_eq!(step2.get(2).unwrap().actual_yield().unwrap(), 0.0, epsilon = 1e-12);

    // obtaining half the theoretical product mass is a 50% yield
    let half_theoretical = 0.5 * limiting_moles * 84.16;
    let step3 = recalculate(&step2,
                            &MoleculeEdit::new(3, EditKind::ActualAmount { grams: Some(half_theoretical) })).unwrap();
    assert_relative_eq!(step3.get(3).unwrap().actual_yield().unwrap(), 0.5, max_relative = 1e-12);

    // the limiting reagent itself never reports a yield
    assert_eq!(step3.get(1).unwrap().actual_yield(), None);
}

#[test]
fn limiting_yield_is_always_null() {
    let table = diels_alder_table();
    let next = recalculate(&table, &MoleculeEdit::new(1, EditKind::ActualAmount { grams: Some(123.4) })).unwrap();
    assert_eq!(next.get(1).unwrap().actual_yield(), None);
}

#[test]
fn excess_goes_negative_when_below_stoichiometric_requirement() {
    let table = diels_alder_table();
    let step1 = recalculate(&table, &MoleculeEdit::new(1, EditKind::ActualAmount { grams: Some(78.11) })).unwrap();
    // limiting moles = 1; supply half a mole of the second reactant
    let step2 = recalculate(&step1, &MoleculeEdit::new(2, EditKind::ActualAmount { grams: Some(33.05) })).unwrap();

    assert_relative_eq!(step2.get(2).unwrap().actual_yield().unwrap(), -0.5, max_relative = 1e-9);
}

#[test]
fn planned_mass_governs_when_no_actual_amount_exists() {
    let table = diels_alder_table();
    // planned 0.1 mol of the limiting reagent
    let step1 = recalculate(&table, &MoleculeEdit::new(1, EditKind::Mass { grams: Some(7.811) })).unwrap();
    let step2 = recalculate(&step1, &MoleculeEdit::new(2, EditKind::ActualAmount { grams: Some(6.61) })).unwrap();

    // 0.1 actual moles against a 0.1-mol scale: exactly matched
    assert_relative_eq!(step2.get(2).unwrap().actual_yield().unwrap(), 0.0, epsilon = 1e-9);
}

#[test]
fn actual_moles_edit_feeds_the_yield_pass() {
    let table = diels_alder_table();
    let step1 = recalculate(&table, &MoleculeEdit::new(1, EditKind::ActualMoles { moles: 1.0 })).unwrap();
    assert_relative_eq!(step1.get(1).unwrap().actual_amount().unwrap(), 78.11, max_relative = 1e-12);

    let step2 = recalculate(&step1, &MoleculeEdit::new(2, EditKind::ActualMoles { moles: 2.0 })).unwrap();
    // two moles against a one-mole requirement: 100% excess
    assert_relative_eq!(step2.get(2).unwrap().actual_yield().unwrap(), 1.0, max_relative = 1e-9);
}

#[test]
fn zero_governing_amount_leaves_the_column_empty() {
    let table = diels_alder_table();
    let with_actual = recalculate(&table, &MoleculeEdit::new(2, EditKind::ActualAmount { grams: Some(10.0) })).unwrap();

    // the limiting reagent has neither mass nor actual amount: no scale
    assert_eq!(with_actual.get(2).unwrap().actual_yield(), None);

    let zeroed = recalculate(&with_actual, &MoleculeEdit::new(1, EditKind::ActualAmount { grams: Some(0.0) })).unwrap();
    assert_eq!(zeroed.get(2).unwrap().actual_yield(), None);
}
