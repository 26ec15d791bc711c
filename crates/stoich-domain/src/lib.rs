// stoich-domain library entry point
pub mod error;
pub mod molecule_record;
pub mod quantity;
pub mod reaction_table;
pub mod role;
pub use error::DomainError;
pub use molecule_record::MoleculeRecord;
pub use quantity::{mass_from_moles, moles_from_mass};
pub use reaction_table::ReactionTable;
pub use role::ReactionRole;
