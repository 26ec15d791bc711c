use serde::{Deserialize, Serialize};
use std::fmt;

use crate::quantity::{mass_from_moles, moles_from_mass};
use crate::{DomainError, ReactionRole};

/// Una especie química participante en la reacción, con su identidad
/// intrínseca (inmutable tras la creación) y su estado cuantitativo editable.
///
/// - Identidad intrínseca: `id`, `role`, `name`, `formula`, `smiles`,
///   `molecular_weight`, `structure_ref`. Un `id` negativo marca un registro
///   temporal todavía no persistido.
/// - Estado editable: `coefficient`, `mass`, `actual_amount`, `notes` y la
///   bandera `limiting_reagent`. `actual_yield` lo escribe únicamente la
///   pasada de rendimiento del motor.
///
/// Los campos son privados: toda modificación pasa por los constructores de
/// copia `with_*`, que validan y devuelven un registro nuevo. La
/// deserialización no valida; `ReactionTable::new` revalida cada registro al
/// ensamblar la colección.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoleculeRecord {
    id: i64,
    role: ReactionRole,
    name: String,
    formula: String,
    smiles: String,
    molecular_weight: f64,
    structure_ref: i64,
    coefficient: f64,
    mass: Option<f64>,
    actual_amount: Option<f64>,
    actual_yield: Option<f64>,
    limiting_reagent: bool,
    notes: Option<String>,
}

fn check_non_negative(field: &str, value: f64) -> Result<(), DomainError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DomainError::Validation(format!("{} debe ser un número no negativo, se recibió {}", field, value)))
    }
}

impl MoleculeRecord {
    /// Crea un registro nuevo con estado cuantitativo por defecto
    /// (coeficiente 1, sin masas ni rendimiento, bandera limitante apagada).
    ///
    /// # Errores
    /// `DomainError::Validation` si el nombre está vacío o el peso molecular
    /// no es estrictamente positivo.
    pub fn new(id: i64,
               role: ReactionRole,
               name: impl Into<String>,
               formula: impl Into<String>,
               smiles: impl Into<String>,
               molecular_weight: f64,
               structure_ref: i64)
               -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::Validation("el nombre de la especie no puede estar vacío".to_string()));
        }
        if !(molecular_weight.is_finite() && molecular_weight > 0.0) {
            return Err(DomainError::Validation(format!("peso molecular inválido para {}: {}", name, molecular_weight)));
        }
        Ok(MoleculeRecord { id,
                            role,
                            name,
                            formula: formula.into(),
                            smiles: smiles.into(),
                            molecular_weight,
                            structure_ref,
                            coefficient: 1.0,
                            mass: None,
                            actual_amount: None,
                            actual_yield: None,
                            limiting_reagent: false,
                            notes: None })
    }

    /// Revalida los invariantes numéricos del registro. Pensado para
    /// registros que no pasaron por `new` (snapshots deserializados).
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(self.molecular_weight.is_finite() && self.molecular_weight > 0.0) {
            return Err(DomainError::Validation(format!("peso molecular inválido para {}: {}", self.name, self.molecular_weight)));
        }
        if !(self.coefficient.is_finite() && self.coefficient > 0.0) {
            return Err(DomainError::Validation(format!("coeficiente inválido para {}: {}", self.name, self.coefficient)));
        }
        if let Some(g) = self.mass {
            check_non_negative("mass", g)?;
        }
        if let Some(g) = self.actual_amount {
            check_non_negative("actualAmount", g)?;
        }
        if self.limiting_reagent && !self.role.can_be_limiting() {
            return Err(DomainError::Validation(format!("{} tiene rol {} y no puede ser reactivo limitante", self.name, self.role)));
        }
        Ok(())
    }

    // ----- constructores de copia (estado editable) -----

    /// Nuevo registro con otro coeficiente estequiométrico (> 0).
    pub fn with_coefficient(&self, coefficient: f64) -> Result<Self, DomainError> {
        if !(coefficient.is_finite() && coefficient > 0.0) {
            return Err(DomainError::Validation(format!("coeficiente inválido para {}: {}", self.name, coefficient)));
        }
        let mut rec = self.clone();
        rec.coefficient = coefficient;
        Ok(rec)
    }

    /// Nuevo registro con otra masa planificada en gramos (`None` = aún no
    /// conocida).
    pub fn with_mass(&self, mass: Option<f64>) -> Result<Self, DomainError> {
        if let Some(g) = mass {
            check_non_negative("mass", g)?;
        }
        let mut rec = self.clone();
        rec.mass = mass;
        Ok(rec)
    }

    /// Nuevo registro con otra cantidad real usada/obtenida en gramos.
    pub fn with_actual_amount(&self, actual_amount: Option<f64>) -> Result<Self, DomainError> {
        if let Some(g) = actual_amount {
            check_non_negative("actualAmount", g)?;
        }
        let mut rec = self.clone();
        rec.actual_amount = actual_amount;
        Ok(rec)
    }

    /// Nuevo registro con el rendimiento/exceso derivado. Puede ser negativo
    /// (déficit respecto al requerimiento estequiométrico); lo escribe la
    /// pasada de rendimiento del motor, no el usuario.
    pub fn with_actual_yield(&self, actual_yield: Option<f64>) -> Self {
        let mut rec = self.clone();
        rec.actual_yield = actual_yield;
        rec
    }

    /// Nuevo registro con la bandera de reactivo limitante. La unicidad de la
    /// bandera dentro de la colección la garantiza `ReactionTable`.
    pub fn with_limiting_reagent(&self, limiting: bool) -> Self {
        let mut rec = self.clone();
        rec.limiting_reagent = limiting;
        rec
    }

    /// Nuevo registro con otras notas libres (sin interacción con el resto
    /// de campos). Una nota en blanco (vacía o solo espacios) equivale a la
    /// celda vacía de la grilla y se guarda como `None`.
    pub fn with_notes(&self, notes: Option<String>) -> Self {
        let mut rec = self.clone();
        rec.notes = notes.filter(|n| !n.trim().is_empty());
        rec
    }

    /// Transición de ciclo de vida al persistir: reemplaza un `id` temporal
    /// (negativo) por el `id` asignado por el servidor.
    ///
    /// # Errores
    /// `DomainError::Validation` si el registro ya está persistido o el `id`
    /// nuevo no es válido.
    pub fn with_persisted_id(&self, id: i64) -> Result<Self, DomainError> {
        if !self.is_temporary() {
            return Err(DomainError::Validation(format!("{} ya está persistido con id {}", self.name, self.id)));
        }
        if id < 0 {
            return Err(DomainError::Validation(format!("id persistido inválido para {}: {}", self.name, id)));
        }
        let mut rec = self.clone();
        rec.id = id;
        Ok(rec)
    }

    // ----- getters -----

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn role(&self) -> ReactionRole {
        self.role
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    pub fn smiles(&self) -> &str {
        &self.smiles
    }

    pub fn molecular_weight(&self) -> f64 {
        self.molecular_weight
    }

    /// Referencia opaca a la estructura química de origen.
    pub fn structure_ref(&self) -> i64 {
        self.structure_ref
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    /// Masa planificada en gramos, si ya se conoce.
    pub fn mass(&self) -> Option<f64> {
        self.mass
    }

    /// Cantidad real usada/obtenida en gramos, si ya se conoce.
    pub fn actual_amount(&self) -> Option<f64> {
        self.actual_amount
    }

    /// Rendimiento (productos) o exceso (reactivos/agentes no limitantes)
    /// derivado; `None` para el propio reactivo limitante.
    pub fn actual_yield(&self) -> Option<f64> {
        self.actual_yield
    }

    pub fn is_limiting(&self) -> bool {
        self.limiting_reagent
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// `true` si el registro todavía no fue persistido (id negativo de
    /// sesión).
    pub fn is_temporary(&self) -> bool {
        self.id < 0
    }

    // ----- columnas derivadas (nunca estado independiente) -----

    /// Moles planificados: `mass / molecular_weight`.
    pub fn moles(&self) -> Option<f64> {
        moles_from_mass(self.mass, self.molecular_weight)
    }

    /// Moles reales: `actual_amount / molecular_weight`.
    pub fn actual_moles(&self) -> Option<f64> {
        moles_from_mass(self.actual_amount, self.molecular_weight)
    }

    /// Gramos equivalentes a una cantidad editada en moles, con el peso
    /// molecular de este registro.
    pub fn mass_for_moles(&self, moles: f64) -> Option<f64> {
        mass_from_moles(Some(moles), self.molecular_weight)
    }
}

impl fmt::Display for MoleculeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {} coef {}>", self.name, self.role, self.coefficient)
    }
}
