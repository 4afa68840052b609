use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::errors::{ServiceError, ServiceResult};
use crate::models::{Category, Movement, Product, Supplier};
use crate::repositories::{find_by_id, Entity, Snapshot};
use crate::seed;
use crate::services::ledger::{self, StockChange};
use crate::storage::KeyValueStore;

/// Suffix of the key a corrupt blob is copied to before it is replaced.
const CORRUPT_SUFFIX: &str = ".corrupt";

/// A container that could not be loaded as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum LoadIssue {
    /// The stored value did not decode; seed data was used instead and the
    /// original value was kept under `backup_key`.
    #[error("container '{key}' could not be decoded ({error}); original kept under '{backup_key}'")]
    Corrupt {
        key: String,
        backup_key: String,
        error: String,
    },
}

impl LoadIssue {
    pub fn key(&self) -> &str {
        match self {
            LoadIssue::Corrupt { key, .. } => key,
        }
    }
}

impl From<&LoadIssue> for ServiceError {
    fn from(issue: &LoadIssue) -> Self {
        match issue {
            LoadIssue::Corrupt { key, error, .. } => ServiceError::corrupt_state(key, error),
        }
    }
}

/// What happened while loading the containers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    /// Keys that had no stored value and were filled with seed data.
    pub seeded: Vec<String>,
    pub issues: Vec<LoadIssue>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// The four entity containers plus the backend they are mirrored to.
///
/// Every mutation rewrites the affected container in full. Nothing checks SKU
/// uniqueness or that referenced categories, suppliers and products exist.
pub struct EntityStore {
    backend: Box<dyn KeyValueStore>,
    products: Vec<Product>,
    categories: Vec<Category>,
    suppliers: Vec<Supplier>,
    movements: Vec<Movement>,
}

fn load_container<T: Entity>(
    backend: &dyn KeyValueStore,
    seed: fn() -> Vec<T>,
    report: &mut LoadReport,
) -> ServiceResult<Vec<T>> {
    let key = T::STORAGE_KEY;
    let Some(raw) = backend.get(key)? else {
        debug!(key, "No stored value; using seed data");
        let items = seed();
        persist(backend, &items)?;
        report.seeded.push(key.to_string());
        return Ok(items);
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(items) => {
            debug!(key, count = items.len(), "Loaded container");
            Ok(items)
        }
        Err(err) => {
            let backup_key = format!("{}{}", key, CORRUPT_SUFFIX);
            warn!(key, %backup_key, error = %err, "Corrupt persisted state; falling back to seed data");
            backend.set(&backup_key, &raw)?;
            let items = seed();
            persist(backend, &items)?;
            report.issues.push(LoadIssue::Corrupt {
                key: key.to_string(),
                backup_key,
                error: err.to_string(),
            });
            Ok(items)
        }
    }
}

fn persist<T: Entity>(backend: &dyn KeyValueStore, items: &[T]) -> ServiceResult<()> {
    let json = serde_json::to_string(items)?;
    backend.set(T::STORAGE_KEY, &json)?;
    Ok(())
}

/// Writes `next` and only then makes it the in-memory container.
fn commit<T: Entity>(backend: &dyn KeyValueStore, slot: &mut Vec<T>, next: Vec<T>) -> ServiceResult<()> {
    persist(backend, &next)?;
    *slot = next;
    Ok(())
}

fn insert<T: Entity>(backend: &dyn KeyValueStore, items: &mut Vec<T>, entity: T) -> ServiceResult<()> {
    let mut next = items.clone();
    next.push(entity);
    commit(backend, items, next)
}

fn replace_by_id<T: Entity>(
    backend: &dyn KeyValueStore,
    items: &mut Vec<T>,
    entity: T,
) -> ServiceResult<bool> {
    let Some(index) = items.iter().position(|item| item.id() == entity.id()) else {
        return Ok(false);
    };
    let mut next = items.clone();
    next[index] = entity;
    commit(backend, items, next)?;
    Ok(true)
}

fn remove_by_id<T: Entity>(backend: &dyn KeyValueStore, items: &mut Vec<T>, id: &str) -> ServiceResult<bool> {
    if !items.iter().any(|item| item.id() == id) {
        return Ok(false);
    }
    let next: Vec<T> = items.iter().filter(|item| item.id() != id).cloned().collect();
    commit(backend, items, next)?;
    Ok(true)
}

impl EntityStore {
    /// Loads every container from `backend`, seeding the ones never stored.
    ///
    /// Corrupt containers do not fail the load; they are listed in the report.
    #[instrument(skip(backend))]
    pub fn load(backend: Box<dyn KeyValueStore>) -> ServiceResult<(Self, LoadReport)> {
        let mut report = LoadReport::default();
        let products = load_container(backend.as_ref(), seed::products, &mut report)?;
        let categories = load_container(backend.as_ref(), seed::categories, &mut report)?;
        let suppliers = load_container(backend.as_ref(), seed::suppliers, &mut report)?;
        let movements = load_container(backend.as_ref(), seed::movements, &mut report)?;

        info!(
            products = products.len(),
            categories = categories.len(),
            suppliers = suppliers.len(),
            movements = movements.len(),
            issues = report.issues.len(),
            "Entity store loaded"
        );

        let store = Self {
            backend,
            products,
            categories,
            suppliers,
            movements,
        };
        Ok((store, report))
    }

    /// Replaces every container with the seed dataset and persists it.
    ///
    /// Memory changes only after all four writes succeed. A failed write can
    /// leave the containers written before it already reset in the backend.
    pub fn reset_to_seed(&mut self) -> ServiceResult<()> {
        let products = seed::products();
        let categories = seed::categories();
        let suppliers = seed::suppliers();
        let movements = seed::movements();
        let backend = self.backend.as_ref();
        persist(backend, &products)?;
        persist(backend, &categories)?;
        persist(backend, &suppliers)?;
        persist(backend, &movements)?;
        self.products = products;
        self.categories = categories;
        self.suppliers = suppliers;
        self.movements = movements;
        info!("Entity store reset to seed data");
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            products: &self.products,
            categories: &self.categories,
            suppliers: &self.suppliers,
            movements: &self.movements,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        find_by_id(&self.products, id)
    }

    pub fn product_by_sku(&self, sku: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.sku == sku)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        find_by_id(&self.categories, id)
    }

    pub fn supplier(&self, id: &str) -> Option<&Supplier> {
        find_by_id(&self.suppliers, id)
    }

    // Products

    pub fn add_product(&mut self, product: Product) -> ServiceResult<()> {
        insert(self.backend.as_ref(), &mut self.products, product)
    }

    /// Replaces the product with the same id. Returns `false` if there is none.
    pub fn update_product(&mut self, product: Product) -> ServiceResult<bool> {
        replace_by_id(self.backend.as_ref(), &mut self.products, product)
    }

    /// Removes the product. Its movements stay in the ledger.
    pub fn delete_product(&mut self, id: &str) -> ServiceResult<bool> {
        remove_by_id(self.backend.as_ref(), &mut self.products, id)
    }

    // Categories

    pub fn add_category(&mut self, category: Category) -> ServiceResult<()> {
        insert(self.backend.as_ref(), &mut self.categories, category)
    }

    pub fn update_category(&mut self, category: Category) -> ServiceResult<bool> {
        replace_by_id(self.backend.as_ref(), &mut self.categories, category)
    }

    /// Removes the category; products that reference it are left as they are.
    pub fn delete_category(&mut self, id: &str) -> ServiceResult<bool> {
        remove_by_id(self.backend.as_ref(), &mut self.categories, id)
    }

    // Suppliers

    pub fn add_supplier(&mut self, supplier: Supplier) -> ServiceResult<()> {
        insert(self.backend.as_ref(), &mut self.suppliers, supplier)
    }

    pub fn update_supplier(&mut self, supplier: Supplier) -> ServiceResult<bool> {
        replace_by_id(self.backend.as_ref(), &mut self.suppliers, supplier)
    }

    /// Removes the supplier; products that reference it are left as they are.
    pub fn delete_supplier(&mut self, id: &str) -> ServiceResult<bool> {
        remove_by_id(self.backend.as_ref(), &mut self.suppliers, id)
    }

    // Movements

    /// Appends `movement` and derives the referenced product's stock.
    ///
    /// The append happens even when the product does not exist; in that case
    /// no stock changes and `None` is returned. Memory is updated only after
    /// the backend accepted both containers. If the product write fails, the
    /// previous ledger is written back before the error is returned.
    pub fn record_movement(&mut self, movement: Movement) -> ServiceResult<Option<StockChange>> {
        let backend = self.backend.as_ref();
        let index = self
            .products
            .iter()
            .position(|product| product.id == movement.product_id);

        let mut products = None;
        let mut change = None;
        if let Some(index) = index {
            let mut next = self.products.clone();
            let product = &mut next[index];
            let previous = product.stock;
            product.stock = ledger::apply_movement(previous, movement.movement_type, movement.quantity);
            product.updated_at = movement.date;
            change = Some(StockChange {
                previous,
                current: product.stock,
            });
            products = Some(next);
        }

        let mut movements = self.movements.clone();
        movements.push(movement);
        persist(backend, &movements)?;

        if let Some(products) = products {
            if let Err(err) = persist(backend, &products) {
                if let Err(restore) = persist(backend, &self.movements) {
                    warn!(error = %restore, "Could not restore the movement ledger after a failed product write");
                }
                return Err(err);
            }
            self.products = products;
        }
        self.movements = movements;
        Ok(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovementType;
    use crate::repositories::{CATEGORIES_KEY, MOVEMENTS_KEY, PRODUCTS_KEY, SUPPLIERS_KEY};
    use crate::storage::{InMemoryStore, StorageError};
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Wraps an in-memory store and fails writes to one chosen key.
    #[derive(Clone, Default)]
    struct FailingStore {
        inner: InMemoryStore,
        failing_key: Arc<Mutex<Option<String>>>,
    }

    impl FailingStore {
        fn fail_on(&self, key: Option<&str>) {
            *self.failing_key.lock().unwrap() = key.map(str::to_string);
        }
    }

    impl KeyValueStore for FailingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.failing_key.lock().unwrap().as_deref() == Some(key) {
                return Err(StorageError::Io(io::Error::new(io::ErrorKind::Other, "disk full")));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }

        fn keys(&self) -> Result<Vec<String>, StorageError> {
            self.inner.keys()
        }
    }

    fn load(backend: &InMemoryStore) -> (EntityStore, LoadReport) {
        EntityStore::load(Box::new(backend.clone())).unwrap()
    }

    fn movement(product_id: &str, kind: MovementType, quantity: u32) -> Movement {
        Movement {
            id: format!("m-{}-{}", product_id, quantity),
            product_id: product_id.to_string(),
            movement_type: kind,
            quantity,
            reason: String::new(),
            notes: String::new(),
            date: Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap(),
            user_id: "tester".to_string(),
        }
    }

    #[test]
    fn empty_backend_is_seeded_and_persisted() {
        let backend = InMemoryStore::new();
        let (store, report) = load(&backend);

        assert_eq!(store.products().len(), 6);
        assert_eq!(report.seeded.len(), 4);
        assert!(report.is_clean());
        for key in [PRODUCTS_KEY, CATEGORIES_KEY, SUPPLIERS_KEY, MOVEMENTS_KEY] {
            assert!(backend.get(key).unwrap().is_some(), "{} not persisted", key);
        }

        let (_, second) = load(&backend);
        assert!(second.seeded.is_empty());
    }

    #[test]
    fn corrupt_container_falls_back_to_seed_and_is_reported() {
        let backend = InMemoryStore::new();
        backend.set(PRODUCTS_KEY, "{not json").unwrap();

        let (store, report) = load(&backend);
        assert_eq!(store.products().len(), 6);
        assert_eq!(report.issues.len(), 1);
        assert_matches!(
            &report.issues[0],
            LoadIssue::Corrupt { key, backup_key, .. }
                if key == PRODUCTS_KEY && backup_key == "inventory-products.corrupt"
        );
        assert_eq!(
            backend.get("inventory-products.corrupt").unwrap().as_deref(),
            Some("{not json")
        );

        let err: ServiceError = (&report.issues[0]).into();
        assert_eq!(err.code(), "corrupt_state");
    }

    #[test]
    fn update_and_delete_are_no_ops_for_unknown_ids() {
        let backend = InMemoryStore::new();
        let (mut store, _) = load(&backend);
        let mut ghost = store.products()[0].clone();
        ghost.id = "missing".to_string();

        assert!(!store.update_product(ghost).unwrap());
        assert!(!store.delete_product("missing").unwrap());
        assert!(!store.delete_category("missing").unwrap());
        assert_eq!(store.products().len(), 6);
        assert_eq!(store.categories().len(), 5);
    }

    #[test]
    fn deleting_everything_persists_empty_containers() {
        let backend = InMemoryStore::new();
        let (mut store, _) = load(&backend);
        let ids: Vec<String> = store.products().iter().map(|p| p.id.clone()).collect();
        for id in ids {
            assert!(store.delete_product(&id).unwrap());
        }

        let (reloaded, report) = load(&backend);
        assert!(reloaded.products().is_empty());
        assert!(report.seeded.is_empty());
    }

    #[test]
    fn deleting_a_category_leaves_its_products() {
        let backend = InMemoryStore::new();
        let (mut store, _) = load(&backend);
        assert!(store.delete_category("1").unwrap());
        assert!(store.delete_supplier("1").unwrap());

        let orphan = store.product("1").unwrap();
        assert_eq!(orphan.category_id, "1");
        assert!(store.category("1").is_none());
        assert!(store.supplier(&orphan.supplier_id).is_none());
    }

    #[test]
    fn record_movement_updates_stock_and_timestamp() {
        let backend = InMemoryStore::new();
        let (mut store, _) = load(&backend);
        let out = movement("1", MovementType::Out, 5);
        let date = out.date;

        let change = store.record_movement(out).unwrap().unwrap();
        assert_eq!(change.previous, 45);
        assert_eq!(change.current, 40);
        assert_eq!(store.product("1").unwrap().updated_at, date);
        assert_eq!(store.movements().len(), 7);

        let (reloaded, _) = load(&backend);
        assert_eq!(reloaded.product("1").unwrap().stock, 40);
        assert_eq!(reloaded.movements().len(), 7);
    }

    #[test]
    fn unknown_product_movement_is_appended_without_stock_effect() {
        let backend = InMemoryStore::new();
        let (mut store, _) = load(&backend);
        let before: Vec<u32> = store.products().iter().map(|p| p.stock).collect();

        let change = store
            .record_movement(movement("nope", MovementType::In, 10))
            .unwrap();
        assert!(change.is_none());
        assert_eq!(store.movements().len(), 7);
        let after: Vec<u32> = store.products().iter().map(|p| p.stock).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn reset_restores_and_persists_seed_data() {
        let backend = InMemoryStore::new();
        let (mut store, _) = load(&backend);
        store.delete_product("1").unwrap();
        store
            .record_movement(movement("2", MovementType::Out, 8))
            .unwrap();

        store.reset_to_seed().unwrap();
        assert_eq!(store.products().len(), 6);
        assert_eq!(store.movements().len(), 6);
        assert_eq!(store.product("2").unwrap().stock, 8);

        let (reloaded, _) = load(&backend);
        assert!(reloaded.product("1").is_some());
        assert_eq!(reloaded.movements().len(), 6);
    }

    #[test]
    fn failed_product_write_keeps_memory_and_ledger_in_step() {
        let backend = FailingStore::default();
        let (mut store, _) = EntityStore::load(Box::new(backend.clone())).unwrap();
        backend.fail_on(Some(PRODUCTS_KEY));

        let result = store.record_movement(movement("1", MovementType::Out, 5));
        assert_matches!(result, Err(ServiceError::StorageError(_)));
        assert_eq!(store.movements().len(), 6);
        assert_eq!(store.product("1").unwrap().stock, 45);

        let mut copy = store.products()[0].clone();
        copy.id = "new".to_string();
        assert!(store.add_product(copy).is_err());
        assert!(store.delete_product("1").is_err());
        assert_eq!(store.products().len(), 6);

        backend.fail_on(None);
        let (reloaded, _) = load(&backend.inner);
        assert_eq!(reloaded.movements().len(), 6);
        assert_eq!(reloaded.product("1").unwrap().stock, 45);
        assert_eq!(reloaded.products().len(), 6);
    }

    #[test]
    fn failed_ledger_write_changes_nothing() {
        let backend = FailingStore::default();
        let (mut store, _) = EntityStore::load(Box::new(backend.clone())).unwrap();
        backend.fail_on(Some(MOVEMENTS_KEY));

        assert!(store
            .record_movement(movement("2", MovementType::In, 4))
            .is_err());
        assert_eq!(store.movements().len(), 6);
        assert_eq!(store.product("2").unwrap().stock, 8);

        backend.fail_on(Some(CATEGORIES_KEY));
        assert!(store.delete_category("1").is_err());
        assert!(store.category("1").is_some());
        assert!(store.reset_to_seed().is_err());
        assert_eq!(store.movements().len(), 6);
    }

    #[test]
    fn sku_lookup_is_case_sensitive() {
        let backend = InMemoryStore::new();
        let (store, _) = load(&backend);
        assert!(store.product_by_sku("WBH-001").is_some());
        assert!(store.product_by_sku("wbh-001").is_none());
    }
}
