use serde::{Deserialize, Serialize};
use std::fmt;

/// Rol de una especie dentro de la reacción.
///
/// El vocabulario serializado (`REACTANT` / `PRODUCT` / `AGENT`) es el
/// contrato con el colaborador de persistencia; no cambiar sin migración.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReactionRole {
    Reactant,
    Product,
    Agent,
}

impl ReactionRole {
    /// Sólo un reactivo puede ser designado como reactivo limitante.
    /// Agentes (catalizadores, disolventes) y productos quedan excluidos.
    pub fn can_be_limiting(&self) -> bool {
        matches!(self, ReactionRole::Reactant)
    }
}

impl fmt::Display for ReactionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ReactionRole::Reactant => "REACTANT",
            ReactionRole::Product => "PRODUCT",
            ReactionRole::Agent => "AGENT",
        };
        write!(f, "{}", tag)
    }
}
