//! StoichFlow Rust Library
//!
//! Este crate actúa como la fachada de StoichFlow:
//! - Re-exporta el dominio (`stoich_domain`) y el motor de recálculo
//!   (`stoich_core`) bajo un solo nombre.
//! - Expone `demo` con la tabla determinista usada por el binario de
//!   validación y los tests end-to-end.
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes.

pub mod demo;

pub use stoich_core::{recalculate, recalculate_row, snapshot_fingerprint, EditKind, EngineError, InMemoryEditLog,
                      MoleculeEdit, RecordDraft, TableSession};
pub use stoich_domain::{DomainError, MoleculeRecord, ReactionRole, ReactionTable};

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn engine_error_tests() {
		let u = EngineError::UnknownRecord(7).to_string();
		assert_eq!(u, "unknown record id 7");
	}

	#[test]
	fn domain_error_tests() {
		let d = DomainError::Validation("x".into()).to_string();
		assert_eq!(d, "Error de validación: x");
	}

	#[test]
	fn demo_table_is_deterministic() {
		let a = demo::diels_alder_table().unwrap();
		let b = demo::diels_alder_table().unwrap();
		assert_eq!(a.composition_hash(), b.composition_hash());
		assert!(a.limiting_reagent().is_some());
	}
}
