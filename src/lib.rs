//! Inventory Ledger Library
//!
//! Product, category and supplier records, an append-only stock movement
//! ledger that derives per-product stock, dashboard reports and CSV export.
//! State is mirrored to a key-value store on every mutation.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod clock;
pub mod config;
pub mod errors;
pub mod models;
pub mod repositories;
pub mod seed;
pub mod services;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AppConfig;
pub use errors::{ServiceError, ServiceResult};
pub use repositories::{EntityStore, LoadIssue, LoadReport, Snapshot};
pub use services::{InventoryService, RecordOutcome};
pub use storage::{FileStore, InMemoryStore, KeyValueStore};
