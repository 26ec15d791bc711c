use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

use stoich_core::{EditKind, EditLog, EngineError, MoleculeEdit, RecordDraft, TableEvent, TableEventKind, TableSession};
use stoich_domain::{MoleculeRecord, ReactionRole, ReactionTable};

fn session_table() -> ReactionTable {
    let records = vec![MoleculeRecord::new(1, ReactionRole::Reactant, "A", "", "", 50.0, 1).unwrap(),
                       MoleculeRecord::new(2, ReactionRole::Reactant, "B", "", "", 20.0, 2).unwrap()
                                                                                           .with_coefficient(2.0)
                                                                                           .unwrap(),
                       MoleculeRecord::new(3, ReactionRole::Product, "C", "", "", 90.0, 3).unwrap(),];
    ReactionTable::new(records, json!({"source": "session-tests"})).unwrap()
}

// Custom journal backend: a flat append-only vector, as a persistence layer
// would implement it
struct FlatLog {
    rows: Vec<TableEvent>,
}

impl EditLog for FlatLog {
    fn append_kind(&mut self, table_id: Uuid, kind: TableEventKind) -> TableEvent {
        let seq = self.rows.iter().filter(|e| e.table_id == table_id).count() as u64;
        let ev = TableEvent { seq,
                              table_id,
                              kind,
                              ts: chrono::Utc::now() };
        self.rows.push(ev.clone());
        ev
    }

    fn list(&self, table_id: Uuid) -> Vec<TableEvent> {
        self.rows.iter().filter(|e| e.table_id == table_id).cloned().collect()
    }
}

#[test]
fn opening_applies_the_default_limiting_reagent() {
    // no record carries the flag; the first reactant receives it on open
    let session = TableSession::open(session_table()).unwrap();
    assert_eq!(session.table().limiting_reagent().map(|r| r.id()), Some(1));
    assert!(!session.is_dirty());
    assert_eq!(session.event_variants(), vec!["L"]);
}

#[test]
fn custom_edit_log_backends_receive_every_event() {
    let log = FlatLog { rows: Vec::new() };
    let mut session = TableSession::open_with_log(session_table(), log).unwrap();

    session.apply(&MoleculeEdit::new(1, EditKind::Mass { grams: Some(10.0) })).unwrap();
    let _ = session.apply(&MoleculeEdit::new(3, EditKind::LimitingReagent));

    let variants = session.event_variants();
    assert_eq!(variants, vec!["L", "E", "X"]);

    // seq grows per table, in append order
    let seqs: Vec<u64> = session.events().iter().map(|e| e.seq).collect();
    assert_eq!(seqs, vec![0, 1, 2]);
}

#[test]
fn rejected_edits_keep_the_error_in_the_journal() {
    let mut session = TableSession::open(session_table()).unwrap();
    let _ = session.apply(&MoleculeEdit::new(3, EditKind::LimitingReagent));

    let events = session.events();
    match &events.last().unwrap().kind {
        TableEventKind::EditRejected { record_id, error } => {
            assert_eq!(*record_id, 3);
            assert_eq!(*error, EngineError::LimitingMustBeReactant);
        }
        other => panic!("expected EditRejected, got {:?}", other),
    }
}

#[test]
fn noop_rows_leave_no_trace() {
    let mut session = TableSession::open(session_table()).unwrap();
    let draft = RecordDraft::from_record(session.table().get(2).unwrap());

    let changed = session.apply_row(&draft).unwrap();
    assert!(!changed);
    assert!(!session.is_dirty());
    assert_eq!(session.event_variants(), vec!["L"]);
}

#[test]
fn fingerprints_track_state_not_history() {
    let mut a = TableSession::open(session_table()).unwrap();
    let mut b = TableSession::open(session_table()).unwrap();

    // same logical state reached in one or two steps
    a.apply(&MoleculeEdit::new(1, EditKind::Mass { grams: Some(10.0) })).unwrap();
    b.apply(&MoleculeEdit::new(1, EditKind::Mass { grams: Some(4.0) })).unwrap();
    b.apply(&MoleculeEdit::new(1, EditKind::Mass { grams: Some(10.0) })).unwrap();

    assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());

    // a different mass is a different fingerprint
    b.apply(&MoleculeEdit::new(1, EditKind::Mass { grams: Some(11.0) })).unwrap();
    assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
}

#[test]
fn journal_events_serialize_for_persistence() {
    let mut session = TableSession::open(session_table()).unwrap();
    session.apply(&MoleculeEdit::new(1, EditKind::Mass { grams: Some(10.0) })).unwrap();
    let temp_id = session.append_reagent("Celite", "", "", 60.0, 4).unwrap();

    let mut server_ids = HashMap::new();
    server_ids.insert(temp_id, 900_i64);
    session.mark_saved(&server_ids).unwrap();

    let text = serde_json::to_string(&session.events()).unwrap();
    let back: Vec<TableEvent> = serde_json::from_str(&text).unwrap();
    assert_eq!(back.len(), 4);
    assert!(matches!(&back[3].kind, TableEventKind::TableSaved { revision: 1, .. }));
}
