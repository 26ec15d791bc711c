//! Errores del motor de recálculo.
//!
//! Taxonomía:
//! - Violaciones de contrato (registro desconocido, campo intrínseco alterado,
//!   edición multi-campo, renormalización sin limitante): el motor las
//!   devuelve tal cual, nunca las corrige en silencio. El llamador revierte al
//!   snapshot previo.
//! - Validación numérica defensiva (valores negativos o no finitos): se
//!   rechazan antes de tocar la colección.
//! - Los `None` de campos aún no conocidos NO son errores: son estados
//!   válidos del dominio.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stoich_domain::DomainError;

#[derive(Debug, Error, PartialEq, Clone, Serialize, Deserialize)]
pub enum EngineError {
    #[error("unknown record id {0}")] UnknownRecord(i64),
    #[error("intrinsic property cannot be modified: {0}")] IntrinsicModified(String),
    #[error("more than one field changed in a single edit: {0}")] MultiFieldEdit(String),
    #[error("no limiting reagent present for renormalization")] MissingLimitingReagent,
    #[error("only a reactant can be the limiting reagent")] LimitingMustBeReactant,
    #[error("negative value for {field}: {value}")] NegativeValue { field: String, value: f64 },
    #[error("non-finite value for {field}")] NonFiniteValue { field: String },
    #[error("non-positive coefficient: {0}")] NonPositiveCoefficient(f64),
    #[error("domain: {0}")] Domain(String),
    #[error("internal: {0}")] Internal(String),
}

// Los errores de dominio que emergen al reconstruir un snapshot se propagan
// aplanados a su mensaje (el enum de dominio no es serializable).
impl From<DomainError> for EngineError {
    fn from(e: DomainError) -> Self {
        EngineError::Domain(e.to_string())
    }
}
