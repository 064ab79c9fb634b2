pub mod audit;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;

pub use audit::{AuditEvent, AuditOutcome, AuditSink, CatalogOperation, InMemoryAuditSink};
pub use catalog::{Catalog, CatalogResult, NewComponent, NewComputer, NewPeripheral};
pub use domain::component::{Component, ComponentKind};
pub use domain::computer::{Computer, ComputerKind, ComputerSnapshot};
pub use domain::peripheral::{Peripheral, PeripheralKind};
pub use domain::product::{ComponentId, ComputerId, PeripheralId, ProductCore};
pub use errors::{CatalogError, ErrorClass};
