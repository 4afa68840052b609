//! Entity shapes persisted by the store.
//!
//! Field names serialize in camelCase and prices as JSON numbers, matching the
//! layout of existing inventory data files.

pub mod category;
pub mod movement;
pub mod product;
pub mod supplier;

pub use category::{Category, CategoryInput};
pub use movement::{Movement, MovementReason, MovementType, NewMovement};
pub use product::{Product, ProductInput, StockStatus};
pub use supplier::{Supplier, SupplierInput};
