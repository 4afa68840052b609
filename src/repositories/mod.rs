use serde::{de::DeserializeOwned, Serialize};

use crate::models::{Category, Movement, Product, Supplier};

pub mod entity_store;

pub use entity_store::{EntityStore, LoadIssue, LoadReport};

/// Storage key of each entity container.
pub const PRODUCTS_KEY: &str = "inventory-products";
pub const CATEGORIES_KEY: &str = "inventory-categories";
pub const SUPPLIERS_KEY: &str = "inventory-suppliers";
pub const MOVEMENTS_KEY: &str = "inventory-movements";

/// An entity kept in one of the persisted containers.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    const STORAGE_KEY: &'static str;
    const KIND: &'static str;

    fn id(&self) -> &str;
}

impl Entity for Product {
    const STORAGE_KEY: &'static str = PRODUCTS_KEY;
    const KIND: &'static str = "Product";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Category {
    const STORAGE_KEY: &'static str = CATEGORIES_KEY;
    const KIND: &'static str = "Category";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Supplier {
    const STORAGE_KEY: &'static str = SUPPLIERS_KEY;
    const KIND: &'static str = "Supplier";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Movement {
    const STORAGE_KEY: &'static str = MOVEMENTS_KEY;
    const KIND: &'static str = "Movement";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Read-only view of all four containers at one point in time.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub products: &'a [Product],
    pub categories: &'a [Category],
    pub suppliers: &'a [Supplier],
    pub movements: &'a [Movement],
}

impl<'a> Snapshot<'a> {
    pub fn product(&self, id: &str) -> Option<&'a Product> {
        find_by_id(self.products, id)
    }

    pub fn category(&self, id: &str) -> Option<&'a Category> {
        find_by_id(self.categories, id)
    }

    pub fn supplier(&self, id: &str) -> Option<&'a Supplier> {
        find_by_id(self.suppliers, id)
    }
}

pub(crate) fn find_by_id<'a, T: Entity>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}
