use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::clock::Clock;
use crate::config::AppConfig;
use crate::errors::{ServiceError, ServiceResult};
use crate::models::{
    Category, CategoryInput, Movement, NewMovement, Product, ProductInput, Supplier, SupplierInput,
};
use crate::repositories::{EntityStore, LoadReport, Snapshot};
use crate::services::ledger::StockChange;
use crate::storage::StorageFactory;

/// Result of recording a movement.
#[derive(Debug, Clone, Serialize)]
pub struct RecordOutcome {
    pub movement: Movement,
    /// `None` when the movement's product does not exist.
    pub stock_change: Option<StockChange>,
}

/// Service for managing inventory records and the movement ledger
pub struct InventoryService {
    store: EntityStore,
    clock: Arc<dyn Clock>,
    strict_references: bool,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl InventoryService {
    /// Creates a new inventory service instance over a loaded store
    pub fn new(store: EntityStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            strict_references: false,
        }
    }

    /// Opens the configured backend, loads the store and applies config policy.
    pub fn open(config: &AppConfig, clock: Arc<dyn Clock>) -> ServiceResult<(Self, LoadReport)> {
        let backend = StorageFactory::create(config)?;
        let (store, report) = EntityStore::load(backend)?;
        for issue in &report.issues {
            warn!(key = issue.key(), "Container replaced with seed data after load failure");
        }
        let service = Self::new(store, clock).with_strict_references(config.strict_references);
        Ok((service, report))
    }

    pub fn with_strict_references(mut self, strict: bool) -> Self {
        self.strict_references = strict;
        self
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.store.snapshot()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    // Products

    #[instrument(skip(self))]
    pub fn create_product(&mut self, input: ProductInput) -> ServiceResult<Product> {
        input.validate()?;
        let product = Product::from_input(new_id(), input, self.clock.now());
        self.store.add_product(product.clone())?;
        info!(product_id = %product.id, sku = %product.sku, "Product created");
        Ok(product)
    }

    /// Applies form input to an existing product, keeping its creation time.
    #[instrument(skip(self))]
    pub fn update_product(&mut self, id: &str, input: ProductInput) -> ServiceResult<Product> {
        input.validate()?;
        let mut product = self
            .store
            .product(id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("Product", id))?;
        product.apply_input(input, self.clock.now());
        self.store.update_product(product.clone())?;
        info!(product_id = %product.id, "Product updated");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub fn delete_product(&mut self, id: &str) -> ServiceResult<bool> {
        let removed = self.store.delete_product(id)?;
        if removed {
            info!(product_id = id, "Product deleted");
        }
        Ok(removed)
    }

    // Categories

    #[instrument(skip(self))]
    pub fn create_category(&mut self, input: CategoryInput) -> ServiceResult<Category> {
        input.validate()?;
        let category = Category::from_input(new_id(), input);
        self.store.add_category(category.clone())?;
        info!(category_id = %category.id, "Category created");
        Ok(category)
    }

    #[instrument(skip(self))]
    pub fn update_category(&mut self, id: &str, input: CategoryInput) -> ServiceResult<Category> {
        input.validate()?;
        if self.store.category(id).is_none() {
            return Err(ServiceError::not_found("Category", id));
        }
        let category = Category::from_input(id.to_string(), input);
        self.store.update_category(category.clone())?;
        Ok(category)
    }

    #[instrument(skip(self))]
    pub fn delete_category(&mut self, id: &str) -> ServiceResult<bool> {
        let removed = self.store.delete_category(id)?;
        let orphaned = self
            .store
            .products()
            .iter()
            .filter(|product| product.category_id == id)
            .count();
        if removed && orphaned > 0 {
            warn!(category_id = id, orphaned, "Deleted category is still referenced by products");
        }
        Ok(removed)
    }

    // Suppliers

    #[instrument(skip(self))]
    pub fn create_supplier(&mut self, input: SupplierInput) -> ServiceResult<Supplier> {
        input.validate()?;
        let supplier = Supplier::from_input(new_id(), input);
        self.store.add_supplier(supplier.clone())?;
        info!(supplier_id = %supplier.id, "Supplier created");
        Ok(supplier)
    }

    #[instrument(skip(self))]
    pub fn update_supplier(&mut self, id: &str, input: SupplierInput) -> ServiceResult<Supplier> {
        input.validate()?;
        if self.store.supplier(id).is_none() {
            return Err(ServiceError::not_found("Supplier", id));
        }
        let supplier = Supplier::from_input(id.to_string(), input);
        self.store.update_supplier(supplier.clone())?;
        Ok(supplier)
    }

    #[instrument(skip(self))]
    pub fn delete_supplier(&mut self, id: &str) -> ServiceResult<bool> {
        let removed = self.store.delete_supplier(id)?;
        let orphaned = self
            .store
            .products()
            .iter()
            .filter(|product| product.supplier_id == id)
            .count();
        if removed && orphaned > 0 {
            warn!(supplier_id = id, orphaned, "Deleted supplier is still referenced by products");
        }
        Ok(removed)
    }

    // Movements

    /// Records a stock movement on behalf of `user_id`.
    ///
    /// With strict references off, a movement for an unknown product is still
    /// appended and reported with no stock change.
    #[instrument(skip(self))]
    pub fn record_movement(
        &mut self,
        input: NewMovement,
        user_id: &str,
    ) -> ServiceResult<RecordOutcome> {
        input.validate()?;
        if user_id.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "user id must not be empty".to_string(),
            ));
        }

        let known = self.store.product(&input.product_id).is_some();
        if !known && self.strict_references {
            return Err(ServiceError::not_found("Product", &input.product_id));
        }

        let movement = input.into_movement(new_id(), self.clock.now(), user_id.to_string());
        let stock_change = self.store.record_movement(movement.clone())?;

        match stock_change {
            Some(change) => {
                if change.was_clamped(&movement) {
                    warn!(
                        product_id = %movement.product_id,
                        requested = movement.quantity,
                        available = change.previous,
                        "Outbound movement exceeded stock; clamped at zero"
                    );
                }
                info!(
                    movement_id = %movement.id,
                    product_id = %movement.product_id,
                    movement_type = %movement.movement_type,
                    quantity = movement.quantity,
                    previous = change.previous,
                    current = change.current,
                    "Movement recorded"
                );
            }
            None => warn!(
                movement_id = %movement.id,
                product_id = %movement.product_id,
                "Movement recorded for unknown product; stock unchanged"
            ),
        }

        Ok(RecordOutcome {
            movement,
            stock_change,
        })
    }

    pub fn reset_to_seed(&mut self) -> ServiceResult<()> {
        self.store.reset_to_seed()
    }
}
