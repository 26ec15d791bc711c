use approx::assert_relative_eq;
use serde_json::json;
use stoich_domain::{moles_from_mass, MoleculeRecord, ReactionRole, ReactionTable};

fn diels_alder_records() -> Vec<MoleculeRecord> {
    vec![MoleculeRecord::new(1, ReactionRole::Reactant, "Benzene", "C6H6", "c1ccccc1", 78.11, 901).unwrap(),
         MoleculeRecord::new(2, ReactionRole::Reactant, "Cyclopentadiene", "C5H6", "C1C=CC=C1", 66.1, 902).unwrap(),
         MoleculeRecord::new(3, ReactionRole::Product, "Cyclohexane", "C6H12", "C1CCCCC1", 84.16, 903).unwrap(),]
}

#[test]
fn test_record_edit_chain_keeps_identity() {
    // A chain of copy-updates must never touch the intrinsic identity
    let base = diels_alder_records().remove(0);
    let edited = base.with_mass(Some(15.622))
                     .unwrap()
                     .with_coefficient(2.0)
                     .unwrap()
                     .with_limiting_reagent(true)
                     .with_notes(Some("stirred 2h".to_string()));

    assert_eq!(edited.id(), base.id());
    assert_eq!(edited.name(), base.name());
    assert_eq!(edited.smiles(), base.smiles());
    assert_eq!(edited.molecular_weight(), base.molecular_weight());
    assert_eq!(edited.structure_ref(), base.structure_ref());

    assert_relative_eq!(edited.moles().unwrap(), 0.2, max_relative = 1e-12);
    assert!(edited.is_limiting());
    assert_eq!(edited.notes(), Some("stirred 2h"));
    // the original copy is untouched
    assert_eq!(base.mass(), None);
    assert!(!base.is_limiting());
}

#[test]
fn test_moles_are_derived_not_stored() {
    let rec = diels_alder_records().remove(1).with_mass(Some(6.61)).unwrap();
    assert_relative_eq!(rec.moles().unwrap(), 0.1, max_relative = 1e-12);

    // serialize the record: only grams travel on the wire
    let value = serde_json::to_value(&rec).unwrap();
    assert!(value.get("mass").is_some());
    assert!(value.get("moles").is_none());
    assert!(value.get("actualMoles").is_none());

    let back: MoleculeRecord = serde_json::from_value(value).unwrap();
    assert_relative_eq!(back.moles().unwrap(), 0.1, max_relative = 1e-12);
}

#[test]
fn test_role_wire_names_inside_record() {
    let rec = diels_alder_records().remove(2);
    let value = serde_json::to_value(&rec).unwrap();
    assert_eq!(value["role"], json!("PRODUCT"));
    assert_eq!(value["molecularWeight"], json!(84.16));
    assert_eq!(value["limitingReagent"], json!(false));
}

#[test]
fn test_table_round_trip_and_default_limiting() {
    let table = ReactionTable::new(diels_alder_records(), json!({"source": "integration"})).unwrap();
    let flagged = table.with_default_limiting();

    let text = serde_json::to_string_pretty(&flagged).unwrap();
    let back: ReactionTable = serde_json::from_str(&text).unwrap();

    assert!(back.verify_integrity().is_ok());
    assert_eq!(back, flagged);
    assert_eq!(back.limiting_reagent().map(|r| r.name().to_string()), Some("Benzene".to_string()));
    assert!(back.is_equivalent(&table));
}

#[test]
fn test_deserialization_rejects_tampered_snapshot() {
    let table = ReactionTable::new(diels_alder_records(), json!({})).unwrap();
    let mut value = serde_json::to_value(&table).unwrap();
    // swap a molecular weight behind the hash's back
    value["records"][0]["molecularWeight"] = json!(100.0);
    let tampered: ReactionTable = serde_json::from_value(value).unwrap();
    assert!(tampered.verify_integrity().is_err());
}

#[test]
fn test_moles_from_mass_guards() {
    assert_eq!(moles_from_mass(Some(10.0), 0.0), None);
    assert_eq!(moles_from_mass(Some(10.0), -5.0), None);
    assert_eq!(moles_from_mass(None, 78.11), None);
    assert_relative_eq!(moles_from_mass(Some(78.11), 78.11).unwrap(), 1.0, max_relative = 1e-12);
}
