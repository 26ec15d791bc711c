use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

use crate::{DomainError, MoleculeRecord, ReactionRole};

/// Snapshot inmutable de la tabla de reacción: la colección completa de
/// especies con su estado cuantitativo en un instante dado.
///
/// - Se construye validada (`new`) y nunca se muta: cada recálculo produce
///   un snapshot sucesor vía `with_records`.
/// - `composition_hash` resume la identidad intrínseca de las especies
///   (no el estado cuantitativo), por lo que es estable a través de los
///   recálculos y sirve para detectar alteraciones de composición.
/// - `provenance` registra de dónde salió la tabla (experimento, archivo,
///   demo) como JSON libre.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionTable {
    id: Uuid,
    composition_hash: String,
    provenance: serde_json::Value,
    records: Vec<MoleculeRecord>,
}

impl ReactionTable {
    /// Crea una tabla nueva a partir de sus registros.
    ///
    /// # Errores
    /// `DomainError::Validation` si la colección está vacía, algún registro
    /// es inválido, hay ids duplicados o más de una bandera de limitante.
    pub fn new(records: Vec<MoleculeRecord>, provenance: serde_json::Value) -> Result<Self, DomainError> {
        Self::check_records(&records)?;
        let composition_hash = Self::calculate_composition_hash(&records);
        Ok(ReactionTable { id: Uuid::new_v4(),
                           composition_hash,
                           provenance,
                           records })
    }

    /// Snapshot sucesor con otros registros, conservando id y procedencia.
    /// Es el constructor que usa el motor de recálculo.
    pub fn with_records(&self, records: Vec<MoleculeRecord>) -> Result<Self, DomainError> {
        Self::check_records(&records)?;
        let composition_hash = Self::calculate_composition_hash(&records);
        Ok(ReactionTable { id: self.id,
                           composition_hash,
                           provenance: self.provenance.clone(),
                           records })
    }

    /// Snapshot sucesor con un registro adicional al final.
    pub fn append_record(&self, record: MoleculeRecord) -> Result<Self, DomainError> {
        let mut records = self.records.clone();
        records.push(record);
        self.with_records(records)
    }

    /// Si ninguna especie lleva la bandera de limitante, la activa en el
    /// primer reactivo (orden de la tabla). Con la bandera ya puesta, o sin
    /// reactivos, devuelve el snapshot sin cambios.
    pub fn with_default_limiting(&self) -> Self {
        if self.limiting_reagent().is_some() {
            return self.clone();
        }
        let mut records = self.records.clone();
        if let Some(first) = records.iter_mut().find(|r| r.role() == ReactionRole::Reactant) {
            *first = first.with_limiting_reagent(true);
        }
        // La bandera no participa del hash de composición.
        ReactionTable { id: self.id,
                        composition_hash: self.composition_hash.clone(),
                        provenance: self.provenance.clone(),
                        records }
    }

    fn check_records(records: &[MoleculeRecord]) -> Result<(), DomainError> {
        if records.is_empty() {
            return Err(DomainError::Validation("una tabla de reacción debe tener al menos una especie".to_string()));
        }
        let mut seen = HashSet::new();
        let mut limiting = 0usize;
        for rec in records {
            rec.validate()?;
            if !seen.insert(rec.id()) {
                return Err(DomainError::Validation(format!("id de registro duplicado en la tabla: {}", rec.id())));
            }
            if rec.is_limiting() {
                limiting += 1;
            }
        }
        if limiting > 1 {
            return Err(DomainError::Validation(format!("solo puede haber un reactivo limitante, se encontraron {}", limiting)));
        }
        Ok(())
    }

    /// Hash SHA-256 de la identidad intrínseca de las especies, en el orden
    /// de la tabla. No incluye coeficientes, masas ni banderas: esos campos
    /// cambian con cada recálculo y el hash debe sobrevivirlos.
    pub fn calculate_composition_hash(records: &[MoleculeRecord]) -> String {
        let mut hasher = Sha256::new();
        for rec in records {
            hasher.update(format!("{}|{}|{}|{}|{}|{}|{}\n",
                                  rec.id(),
                                  rec.role(),
                                  rec.name(),
                                  rec.formula(),
                                  rec.smiles(),
                                  rec.molecular_weight(),
                                  rec.structure_ref()));
        }
        format!("{:x}", hasher.finalize())
    }

    /// Verifica que el hash almacenado siga correspondiendo a los registros.
    pub fn verify_integrity(&self) -> Result<(), DomainError> {
        let calculated = Self::calculate_composition_hash(&self.records);
        if calculated != self.composition_hash {
            return Err(DomainError::Validation(format!("hash de composición inconsistente: esperado {}, calculado {}", self.composition_hash, calculated)));
        }
        Ok(())
    }

    /// `true` si ambas tablas tienen la misma composición química, sin
    /// importar el estado cuantitativo.
    #[inline]
    pub fn is_equivalent(&self, other: &ReactionTable) -> bool {
        self.composition_hash == other.composition_hash
    }

    // ----- getters / consultas -----

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn composition_hash(&self) -> &str {
        &self.composition_hash
    }

    pub fn provenance(&self) -> &serde_json::Value {
        &self.provenance
    }

    pub fn records(&self) -> &[MoleculeRecord] {
        &self.records
    }

    /// Registro con el `id` dado, si existe.
    pub fn get(&self, id: i64) -> Option<&MoleculeRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Posición (orden de tabla) del registro con el `id` dado.
    pub fn position(&self, id: i64) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    #[inline]
    pub fn contains(&self, id: i64) -> bool {
        self.get(id).is_some()
    }

    /// El reactivo limitante actual, si alguna especie lleva la bandera.
    pub fn limiting_reagent(&self) -> Option<&MoleculeRecord> {
        self.records.iter().find(|r| r.is_limiting())
    }

    /// Siguiente id temporal libre (negativo, decreciente) para registros
    /// agregados en sesión antes de persistir.
    pub fn next_temporary_id(&self) -> i64 {
        self.records.iter().map(|r| r.id()).filter(|id| *id < 0).min().unwrap_or(0) - 1
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// Dos snapshots son iguales si sus registros coinciden campo a campo; el id
// de tabla y la procedencia no participan (un sucesor conserva ambos).
impl PartialEq for ReactionTable {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl<'a> IntoIterator for &'a ReactionTable {
    type Item = &'a MoleculeRecord;
    type IntoIter = std::slice::Iter<'a, MoleculeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl IntoIterator for ReactionTable {
    type Item = MoleculeRecord;
    type IntoIter = std::vec::IntoIter<MoleculeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl fmt::Display for ReactionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<tabla {} especies, hash {}>", self.records.len(), &self.composition_hash[..12.min(self.composition_hash.len())])
    }
}
