mod config;

use std::fs;
use std::process;

use log::debug;
use stoich_core::{EditKind, MoleculeEdit, TableSession};
use stoich_domain::ReactionTable;

use crate::config::init_logging;

fn main() {
    // Cargar .env si existe para obtener STOICH_LOG
    let _ = dotenvy::dotenv();
    init_logging();

    // CLI mínima:
    //   stoich-cli show   --file <PATH>
    //   stoich-cli recalc --file <PATH> --id <N> --field <COL> [--value <V>] [--out <PATH>]
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(|s| s.as_str()) {
        Some("show") => run_show(&args[2..]),
        Some("recalc") => run_recalc(&args[2..]),
        _ => {
            println!("stoich-cli: use 'show' or 'recalc' subcommands");
        }
    }
}

fn run_show(args: &[String]) {
    let mut file: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        if args[i].as_str() == "--file" {
            i += 1;
            if i < args.len() {
                file = Some(args[i].clone());
            }
        }
        i += 1;
    }

    if let Some(path) = file {
        let table = load_table(&path);
        let session = match TableSession::open(table) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("[stoich show] error: {e}");
                process::exit(5);
            }
        };
        print_table(session.table());
        match session.fingerprint() {
            Ok(fp) => println!("fingerprint: {fp}"),
            Err(e) => {
                eprintln!("[stoich show] error: {e}");
                process::exit(5);
            }
        }
    } else {
        eprintln!("Uso: stoich-cli show --file <PATH>");
        process::exit(2);
    }
}

fn run_recalc(args: &[String]) {
    let mut file: Option<String> = None;
    let mut id: Option<i64> = None;
    let mut field: Option<String> = None;
    let mut value: Option<String> = None;
    let mut out: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--file" => {
                i += 1;
                if i < args.len() {
                    file = Some(args[i].clone());
                }
            }
            "--id" => {
                i += 1;
                if i < args.len() {
                    id = args[i].parse::<i64>().ok();
                }
            }
            "--field" => {
                i += 1;
                if i < args.len() {
                    field = Some(args[i].clone());
                }
            }
            "--value" => {
                i += 1;
                if i < args.len() {
                    value = Some(args[i].clone());
                }
            }
            "--out" => {
                i += 1;
                if i < args.len() {
                    out = Some(args[i].clone());
                }
            }
            _ => {}
        }
        i += 1;
    }

    if let (Some(path), Some(record_id), Some(field)) = (file, id, field) {
        let edit = match parse_edit(record_id, &field, value.as_deref()) {
            Ok(e) => e,
            Err(msg) => {
                eprintln!("[stoich recalc] {msg}");
                process::exit(2);
            }
        };
        debug!("parsed edit: record {} field {}", edit.record_id, edit.kind.field());

        let table = load_table(&path);
        let mut session = match TableSession::open(table) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("[stoich recalc] error: {e}");
                process::exit(5);
            }
        };
        match session.apply(&edit) {
            Ok(table) => print_table(table),
            Err(e) => {
                eprintln!("[stoich recalc] edición rechazada: {e}");
                process::exit(4);
            }
        }

        if let Some(out_path) = out {
            let json = match serde_json::to_string_pretty(session.table()) {
                Ok(j) => j,
                Err(e) => {
                    eprintln!("[stoich recalc] error serializando: {e}");
                    process::exit(5);
                }
            };
            if let Err(e) = fs::write(&out_path, json) {
                eprintln!("[stoich recalc] no se pudo escribir {out_path}: {e}");
                process::exit(5);
            }
            println!("snapshot escrito en {out_path}");
        }
    } else {
        eprintln!("Uso: stoich-cli recalc --file <PATH> --id <N> --field <COL> [--value <V>] [--out <PATH>]");
        process::exit(2);
    }
}

// Traducción de --field/--value a la intención tipada. "null" o un valor en
// blanco en una columna nula significa vaciar la celda.
fn parse_edit(record_id: i64, field: &str, value: Option<&str>) -> Result<MoleculeEdit, String> {
    let kind = match field {
        "notes" => EditKind::Notes { value: value.filter(|v| !v.trim().is_empty() && *v != "null").map(|v| v.to_string()) },
        "mass" => EditKind::Mass { grams: parse_amount(value)? },
        "moles" => EditKind::Moles { moles: parse_number(field, value)? },
        "actualAmount" => EditKind::ActualAmount { grams: parse_amount(value)? },
        "actualMoles" => EditKind::ActualMoles { moles: parse_number(field, value)? },
        "limitingReagent" => EditKind::LimitingReagent,
        "coefficient" => EditKind::Coefficient { value: parse_number(field, value)? },
        other => return Err(format!("campo no editable: {other}")),
    };
    Ok(MoleculeEdit::new(record_id, kind))
}

fn parse_amount(value: Option<&str>) -> Result<Option<f64>, String> {
    match value {
        None | Some("null") => Ok(None),
        Some(v) if v.trim().is_empty() => Ok(None),
        Some(v) => v.parse::<f64>().map(Some).map_err(|e| format!("valor numérico inválido '{v}': {e}")),
    }
}

fn parse_number(field: &str, value: Option<&str>) -> Result<f64, String> {
    match value {
        None => Err(format!("--value es obligatorio para {field}")),
        Some(v) => v.parse::<f64>().map_err(|e| format!("valor numérico inválido '{v}': {e}")),
    }
}

fn load_table(path: &str) -> ReactionTable {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("[stoich] no se pudo leer {path}: {e}");
            process::exit(4);
        }
    };
    let table: ReactionTable = match serde_json::from_str(&text) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("[stoich] snapshot inválido: {e}");
            process::exit(4);
        }
    };
    if let Err(e) = table.verify_integrity() {
        eprintln!("[stoich] snapshot corrupto: {e}");
        process::exit(4);
    }
    debug!("snapshot loaded from {}: {} records", path, table.len());
    table
}

fn print_table(table: &ReactionTable) {
    print!("{}", render_table(table));
}

// Render textual de la tabla, columnas derivadas incluidas ("-" = celda
// vacía).
fn render_table(table: &ReactionTable) -> String {
    let mut out = format!("tabla {} ({} especies)\n", table.id(), table.len());
    out.push_str(&format!("{:>6} {:<9} {:<20} {:>8} {:>12} {:>12} {:>12} {:>12} {:>10} {:>3}\n",
                          "id", "rol", "nombre", "coef", "masa[g]", "moles", "real[g]", "real[mol]", "rend/exc", "lim"));
    for rec in table {
        out.push_str(&format!("{:>6} {:<9} {:<20} {:>8.3} {:>12} {:>12} {:>12} {:>12} {:>10} {:>3}\n",
                              rec.id(),
                              rec.role().to_string(),
                              rec.name(),
                              rec.coefficient(),
                              fmt_opt(rec.mass()),
                              fmt_opt(rec.moles()),
                              fmt_opt(rec.actual_amount()),
                              fmt_opt(rec.actual_moles()),
                              fmt_opt(rec.actual_yield()),
                              if rec.is_limiting() { "*" } else { "" }));
    }
    out
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.4}"),
        None => "-".to_string(),
    }
}
