#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use inventory_ledger::{
    clock::FixedClock,
    config::{AppConfig, StorageBackend},
    repositories::{EntityStore, LoadReport},
    services::InventoryService,
    storage::InMemoryStore,
};

/// Clock time every harness service reports.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 20, 9, 0, 0).unwrap()
}

/// Service over a fresh in-memory store, seeded and pinned to [`test_now`].
///
/// The returned store handle shares its map with the service's backend.
pub fn in_memory_service() -> (InventoryService, InMemoryStore) {
    let backend = InMemoryStore::new();
    let (store, _) = EntityStore::load(Box::new(backend.clone())).unwrap();
    let service = InventoryService::new(store, Arc::new(FixedClock(test_now())));
    (service, backend)
}

pub fn file_config(data_dir: &Path) -> AppConfig {
    AppConfig {
        storage_backend: StorageBackend::File,
        data_dir: data_dir.to_path_buf(),
        ..AppConfig::default()
    }
}

/// Opens a file-backed service rooted at `data_dir`.
pub fn open_file_service(data_dir: &Path) -> (InventoryService, LoadReport) {
    InventoryService::open(&file_config(data_dir), Arc::new(FixedClock(test_now()))).unwrap()
}
