//! Stock arithmetic and read-side queries over the movement ledger.
//!
//! Stock never goes below zero: an `out` larger than the current stock floors
//! at zero, and the floor applies at each step of a replay, so the order of
//! movements matters.

use serde::Serialize;

use crate::models::{Movement, MovementType, Product};
use crate::repositories::Snapshot;

/// Applies one movement to a stock level.
pub fn apply_movement(stock: u32, movement_type: MovementType, quantity: u32) -> u32 {
    match movement_type {
        MovementType::In => stock.saturating_add(quantity),
        MovementType::Out => stock.saturating_sub(quantity),
    }
}

/// Folds movements over an initial stock level, clamping at every step.
pub fn replay<'a, I>(initial: u32, movements: I) -> u32
where
    I: IntoIterator<Item = &'a Movement>,
{
    movements.into_iter().fold(initial, |stock, movement| {
        apply_movement(stock, movement.movement_type, movement.quantity)
    })
}

/// Stock before and after a recorded movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockChange {
    pub previous: u32,
    pub current: u32,
}

impl StockChange {
    /// True when the floor at zero swallowed part of an outbound quantity.
    pub fn was_clamped(&self, movement: &Movement) -> bool {
        movement.movement_type == MovementType::Out && self.previous < movement.quantity
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementTotals {
    pub total_in: u64,
    pub total_out: u64,
    pub net: i64,
    pub count: usize,
}

pub fn totals<'a, I>(movements: I) -> MovementTotals
where
    I: IntoIterator<Item = &'a Movement>,
{
    let mut totals = MovementTotals::default();
    for movement in movements {
        match movement.movement_type {
            MovementType::In => totals.total_in += u64::from(movement.quantity),
            MovementType::Out => totals.total_out += u64::from(movement.quantity),
        }
        totals.count += 1;
    }
    totals.net = totals.total_in as i64 - totals.total_out as i64;
    totals
}

/// Newest first, at most `limit` entries.
pub fn recent(movements: &[Movement], limit: usize) -> Vec<&Movement> {
    let mut sorted: Vec<&Movement> = movements.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(limit);
    sorted
}

pub fn movements_for_product<'a>(movements: &'a [Movement], product_id: &str) -> Vec<&'a Movement> {
    movements
        .iter()
        .filter(|movement| movement.product_id == product_id)
        .collect()
}

/// Search criteria for the movement history list.
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    /// Case-insensitive substring of the product name or SKU.
    pub search: Option<String>,
    pub movement_type: Option<MovementType>,
    pub product_id: Option<String>,
}

fn matches_search(product: Option<&Product>, needle: &str) -> bool {
    match product {
        Some(product) => {
            product.name.to_lowercase().contains(needle)
                || product.sku.to_lowercase().contains(needle)
        }
        None => false,
    }
}

/// Movements matching `filter`, newest first.
///
/// Only movements whose product still exists are listed; the ledger itself
/// keeps the others and they still count toward totals and trends.
pub fn filter_movements<'a>(snapshot: &Snapshot<'a>, filter: &MovementFilter) -> Vec<&'a Movement> {
    let needle = filter
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();

    let mut matches: Vec<&'a Movement> = snapshot
        .movements
        .iter()
        .filter(|movement| {
            filter
                .movement_type
                .map_or(true, |kind| movement.movement_type == kind)
        })
        .filter(|movement| {
            filter
                .product_id
                .as_deref()
                .map_or(true, |id| movement.product_id == id)
        })
        .filter(|movement| matches_search(snapshot.product(&movement.product_id), &needle))
        .collect();
    matches.sort_by(|a, b| b.date.cmp(&a.date));
    matches
}
