//! Collaborator ports and their in-memory implementation.

mod memory;
mod ports;

pub use memory::{InMemoryStore, TenantSnapshot};
pub use ports::{
    AvailabilityStore, DecisionRepository, EquityRepository, PersonnelDirectory,
    RosterRepository, ShiftTypeCatalog,
};
