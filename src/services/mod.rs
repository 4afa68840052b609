// Record management and the movement ledger
pub mod inventory;
pub mod ledger;

// Read-side views
pub mod export;
pub mod reports;

pub use inventory::{InventoryService, RecordOutcome};
