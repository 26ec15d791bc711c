/// Validación R3: redesignación del limitante y renormalización de
/// coeficientes contra el coeficiente previo del nuevo limitante.
fn run_r3_validation() {
    use serde_json::json;
    use stoichflow_rust::{recalculate, EditKind, MoleculeEdit, MoleculeRecord, ReactionRole, ReactionTable};

    // Tabla mínima con coeficientes {1, 2, 4} y A como limitante
    let records = vec![MoleculeRecord::new(1, ReactionRole::Reactant, "A", "A1", "A", 50.0, 11).expect("A ok")
                                                                                              .with_limiting_reagent(true),
                       MoleculeRecord::new(2, ReactionRole::Reactant, "B", "B1", "B", 20.0, 12).expect("B ok")
                                                                                              .with_coefficient(2.0)
                                                                                              .expect("coef B"),
                       MoleculeRecord::new(3, ReactionRole::Product, "C", "C1", "C", 90.0, 13).expect("C ok")
                                                                                             .with_coefficient(4.0)
                                                                                             .expect("coef C"),];
    let table = ReactionTable::new(records, json!({ "source": "main_demo_r3" })).expect("table ok");

    // Mover la bandera a B (coeficiente previo 2) divide todos los
    // coeficientes por 2: {1, 2, 4} -> {0.5, 1, 2}
    let next = recalculate(&table, &MoleculeEdit::new(2, EditKind::LimitingReagent)).expect("redesignación ok");
    assert!(!next.get(1).expect("A").is_limiting(), "R3: A debe perder la bandera");
    assert!(next.get(2).expect("B").is_limiting(), "R3: B debe ser el limitante");
    assert_eq!(next.get(1).expect("A").coefficient(), 0.5, "R3: coeficiente de A renormalizado");
    assert_eq!(next.get(2).expect("B").coefficient(), 1.0, "R3: el nuevo limitante queda en 1");
    assert_eq!(next.get(3).expect("C").coefficient(), 2.0, "R3: coeficiente de C renormalizado");

    // La bandera nunca puede caer sobre un producto
    let err = recalculate(&next, &MoleculeEdit::new(3, EditKind::LimitingReagent));
    assert!(err.is_err(), "R3: un producto no puede ser limitante");

    println!("!Validación R3: OK (bandera movida y coeficientes renormalizados)");
}

use std::collections::HashMap;

use stoichflow_rust::demo::{diels_alder_table, BENZENE_ID, CYCLOHEXANE_ID, CYCLOPENTADIENE_ID};
use stoichflow_rust::{recalculate, snapshot_fingerprint, EditKind, MoleculeEdit, RecordDraft, TableSession};

fn main() {
    // Cargar variables de entorno desde .env si existe
    let _ = dotenvy::dotenv();

    // R1: tabla demo determinista, hash de composición y fingerprint
    let table = diels_alder_table().expect("tabla demo ok");
    let again = diels_alder_table().expect("tabla demo ok");
    println!("[R1] composition_hash: {}", table.composition_hash());
    let fp_a = snapshot_fingerprint(&table).expect("fingerprint ok");
    let fp_b = snapshot_fingerprint(&again).expect("fingerprint ok");
    println!("[R1] fingerprint: {}", fp_a);
    println!("[R1] determinismo: fp_a == fp_b ? {}", fp_a == fp_b);
    assert_eq!(fp_a, fp_b, "R1: dos construcciones idénticas deben compartir fingerprint");
    println!("!Validación R1: OK (tabla demo reproducible)");

    // R2: propagación de masas desde el reactivo limitante
    println!("--- Iniciando validación R2 ---");
    run_r2_validation();

    // R3: redesignación del limitante
    println!("--- Iniciando validación R3 ---");
    run_r3_validation();

    // R4: rendimiento y exceso sobre una sesión con diario en memoria
    println!("--- Iniciando validación R4 ---");
    let mut session = TableSession::open(table).expect("sesión ok");
    session.apply(&MoleculeEdit::new(BENZENE_ID, EditKind::ActualAmount { grams: Some(70.3) }))
           .expect("actual del limitante ok");
    let limiting_moles = 70.3 / 78.11;

    // Ciclopentadieno estequiométricamente justo: exceso 0
    let matched = limiting_moles * 66.1;
    session.apply(&MoleculeEdit::new(CYCLOPENTADIENE_ID, EditKind::ActualAmount { grams: Some(matched) }))
           .expect("actual del segundo reactivo ok");
    // La mitad de la masa teórica de producto: rendimiento 0.5
    let half_theoretical = 0.5 * limiting_moles * 84.16;
    session.apply(&MoleculeEdit::new(CYCLOHEXANE_ID, EditKind::ActualAmount { grams: Some(half_theoretical) }))
           .expect("actual del producto ok");

    for rec in session.table() {
        println!("[R4] {:<16} {:>9} coef {:>4} yield {:?}",
                 rec.name(),
                 rec.role().to_string(),
                 rec.coefficient(),
                 rec.actual_yield());
    }
    let snapshot = session.table();
    assert_eq!(snapshot.get(BENZENE_ID).expect("benceno").actual_yield(),
               None,
               "R4: el limitante nunca reporta rendimiento");
    let excess = snapshot.get(CYCLOPENTADIENE_ID).expect("ciclopentadieno").actual_yield().expect("exceso presente");
    assert!(excess.abs() < 1e-9, "R4: reactivo justo debe dar exceso 0");
    let product_yield = snapshot.get(CYCLOHEXANE_ID).expect("ciclohexano").actual_yield().expect("rendimiento presente");
    assert!((product_yield - 0.5).abs() < 1e-9, "R4: mitad de la masa teórica es rendimiento 0.5");
    println!("!Validación R4: OK (columna de rendimiento/exceso consistente)");

    // R5: fila de grilla reducida a una intención
    println!("--- Iniciando validación R5 ---");
    run_r5_validation();

    // R6: alta de reactivo con id temporal y transición de guardado
    println!("--- Iniciando validación R6 ---");
    let temp_id = session.append_reagent("Pyridine", "C5H5N", "c1ccncc1", 79.1, 904)
                         .expect("alta de reactivo ok");
    println!("[R6] id temporal asignado: {}", temp_id);
    assert!(temp_id < 0, "R6: el alta local usa ids negativos");
    assert!(session.is_dirty(), "R6: la sesión queda dirty tras editar");

    let mut server_ids = HashMap::new();
    server_ids.insert(temp_id, 4_i64);
    let revision = session.mark_saved(&server_ids).expect("guardado ok");
    println!("[R6] revisión persistida: {}", revision);
    assert_eq!(revision, 1, "R6: primer guardado debe ser la revisión 1");
    assert!(!session.is_dirty(), "R6: el guardado limpia la bandera dirty");
    assert!(session.table().get(4).is_some(), "R6: el id temporal debe quedar remapeado");

    let variants = session.event_variants();
    println!("[R6] secuencia de eventos: {:?}", variants);
    assert_eq!(variants, vec!["L", "E", "E", "E", "A", "S"], "R6: diario completo de la sesión");
    println!("!Validación R6: OK (diario, alta y guardado)");
}

/// Validación R2: editar la masa del limitante propaga masas a toda la tabla
/// según `coef * (molesLimitante / coefLimitante) * masaMolar`.
fn run_r2_validation() {
    use serde_json::json;
    use stoichflow_rust::{MoleculeRecord, ReactionRole, ReactionTable};

    let records = vec![MoleculeRecord::new(1, ReactionRole::Reactant, "A", "A1", "A", 50.0, 21).expect("A ok")
                                                                                              .with_limiting_reagent(true),
                       MoleculeRecord::new(2, ReactionRole::Reactant, "B", "B1", "B", 20.0, 22).expect("B ok")
                                                                                              .with_coefficient(2.0)
                                                                                              .expect("coef B"),
                       MoleculeRecord::new(3, ReactionRole::Product, "C", "C1", "C", 90.0, 23).expect("C ok"),];
    let table = ReactionTable::new(records, json!({ "source": "main_demo_r2" })).expect("table ok");

    // 10 g de A son 0.2 mol de escala: B = 2*0.2*20 = 8 g, C = 1*0.2*90 = 18 g
    let next = recalculate(&table, &MoleculeEdit::new(1, EditKind::Mass { grams: Some(10.0) })).expect("masa ok");
    assert_eq!(next.get(1).expect("A").mass(), Some(10.0), "R2: la celda editada conserva el valor tipeado");
    assert_eq!(next.get(2).expect("B").mass(), Some(8.0), "R2: masa de B derivada de la escala molar");
    assert_eq!(next.get(3).expect("C").mass(), Some(18.0), "R2: masa de C derivada de la escala molar");

    // Vaciar la masa del limitante vacía la columna completa
    let cleared = recalculate(&next, &MoleculeEdit::new(1, EditKind::Mass { grams: None })).expect("clear ok");
    assert!(cleared.records().iter().all(|r| r.mass().is_none()),
            "R2: sin masa en el limitante no queda masa derivada");

    // Editar la masa de un no limitante es un cambio local
    let local = recalculate(&next, &MoleculeEdit::new(2, EditKind::Mass { grams: Some(5.0) })).expect("masa local ok");
    assert_eq!(local.get(2).expect("B").mass(), Some(5.0), "R2: B toma el valor tipeado");
    assert_eq!(local.get(3).expect("C").mass(), Some(18.0), "R2: C no cambia en una edición local");

    println!("!Validación R2: OK (propagación de masas desde el limitante)");
}

/// Validación R5: la fila confirmada por la grilla se reduce a exactamente
/// una intención; los ecos de columnas derivadas no cuentan como cambio.
fn run_r5_validation() {
    let table = diels_alder_table().expect("tabla demo ok");
    let mut session = TableSession::open(table).expect("sesión ok");

    // Fila sin cambios: no-op, sin asiento en el diario
    let row = RecordDraft::from_record(session.table().get(BENZENE_ID).expect("benceno"));
    let changed = session.apply_row(&row).expect("fila ok");
    assert!(!changed, "R5: una fila idéntica no debe generar edición");

    // Editar moles en la grilla llega como gramos al motor
    let mut row = RecordDraft::from_record(session.table().get(BENZENE_ID).expect("benceno"));
    row.moles = Some(0.5);
    let changed = session.apply_row(&row).expect("fila ok");
    assert!(changed, "R5: la fila editada debe aplicar");
    let mass = session.table().get(BENZENE_ID).expect("benceno").mass().expect("masa derivada");
    assert!((mass - 0.5 * 78.11).abs() < 1e-9, "R5: 0.5 mol de benceno en gramos");

    // Una fila que toca dos columnas a la vez se rechaza completa
    let mut row = RecordDraft::from_record(session.table().get(CYCLOPENTADIENE_ID).expect("ciclopentadieno"));
    row.mass = Some(1.0);
    row.notes = Some("dos cambios".into());
    assert!(session.apply_row(&row).is_err(), "R5: dos cambios reales deben rechazarse");

    println!("[R5] eventos tras la grilla: {:?}", session.event_variants());
    println!("!Validación R5: OK (adaptador de filas de grilla)");
}
