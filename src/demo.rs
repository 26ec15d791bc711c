//! Tabla de demostración determinista.
//!
//! - `diels_alder_table` arma la tabla Benceno / Ciclopentadieno / Ciclohexano
//!   con el benceno como reactivo limitante y coeficientes 1.
//! - La provenance es un JSON fijo para que el fingerprint inicial sea
//!   reproducible entre corridas y entre procesos.

use serde_json::json;
use stoich_domain::{DomainError, MoleculeRecord, ReactionRole, ReactionTable};

/// Identificadores estables de la tabla de demostración.
pub const BENZENE_ID: i64 = 1;
pub const CYCLOPENTADIENE_ID: i64 = 2;
pub const CYCLOHEXANE_ID: i64 = 3;

/// Construye la tabla de demostración. Siempre produce la misma composición,
/// por lo que dos llamadas comparten `composition_hash`.
pub fn diels_alder_table() -> Result<ReactionTable, DomainError> {
    let records =
        vec![MoleculeRecord::new(BENZENE_ID, ReactionRole::Reactant, "Benzene", "C6H6", "c1ccccc1", 78.11, 901)?
                 .with_limiting_reagent(true),
             MoleculeRecord::new(CYCLOPENTADIENE_ID,
                                 ReactionRole::Reactant,
                                 "Cyclopentadiene",
                                 "C5H6",
                                 "C1C=CC=C1",
                                 66.1,
                                 902)?,
             MoleculeRecord::new(CYCLOHEXANE_ID, ReactionRole::Product, "Cyclohexane", "C6H12", "C1CCCCC1", 84.16, 903)?,];
    ReactionTable::new(records, json!({ "source": "demo", "version": 1 }))
}
