//! Dashboard and report aggregations.
//!
//! Every function here is a pure computation over a [`Snapshot`]; nothing is
//! cached and every call recomputes from the full containers.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use strum::{Display, EnumString};

use crate::errors::{ServiceError, ServiceResult};
use crate::models::{Movement, Product};
use crate::repositories::Snapshot;
use crate::services::ledger::{self, MovementTotals};

pub const UNKNOWN_PRODUCT: &str = "Unknown Product";
pub const UNKNOWN_SKU: &str = "Unknown SKU";
pub const UNKNOWN: &str = "Unknown";

pub fn product_name<'a>(snapshot: &Snapshot<'a>, product_id: &str) -> &'a str {
    snapshot
        .product(product_id)
        .map_or(UNKNOWN_PRODUCT, |product| product.name.as_str())
}

pub fn product_sku<'a>(snapshot: &Snapshot<'a>, product_id: &str) -> &'a str {
    snapshot
        .product(product_id)
        .map_or(UNKNOWN_SKU, |product| product.sku.as_str())
}

pub fn category_name<'a>(snapshot: &Snapshot<'a>, category_id: &str) -> &'a str {
    snapshot
        .category(category_id)
        .map_or(UNKNOWN, |category| category.name.as_str())
}

pub fn supplier_name<'a>(snapshot: &Snapshot<'a>, supplier_id: &str) -> &'a str {
    snapshot
        .supplier(supplier_id)
        .map_or(UNKNOWN, |supplier| supplier.name.as_str())
}

/// Longest trend window, in days.
pub const MAX_TREND_DAYS: u32 = 366;

/// `price * stock` of one product.
pub fn stock_value(product: &Product) -> ServiceResult<Decimal> {
    product.total_value().ok_or_else(|| {
        ServiceError::ValueOverflow(format!("stock value of product {}", product.id))
    })
}

fn add_value(total: Decimal, value: Decimal) -> ServiceResult<Decimal> {
    total
        .checked_add(value)
        .ok_or_else(|| ServiceError::ValueOverflow("summed stock value".to_string()))
}

/// Σ `price * stock` over all products.
pub fn total_stock_value(products: &[Product]) -> ServiceResult<Decimal> {
    products
        .iter()
        .try_fold(Decimal::ZERO, |total, product| add_value(total, stock_value(product)?))
}

/// Products with `stock <= min_stock`, optionally restricted to one category.
pub fn low_stock<'a>(products: &'a [Product], category_id: Option<&str>) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|product| category_id.map_or(true, |id| product.category_id == id))
        .filter(|product| product.is_low_stock())
        .collect()
}

pub fn out_of_stock(products: &[Product]) -> Vec<&Product> {
    products
        .iter()
        .filter(|product| product.is_out_of_stock())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRollup {
    pub category_id: Option<String>,
    /// `None` for the bucket of products whose category does not exist.
    pub category_name: Option<String>,
    pub product_count: usize,
    pub total_stock: u64,
    pub total_value: Decimal,
    pub low_stock_count: usize,
}

impl CategoryRollup {
    fn empty(category_id: Option<String>, category_name: Option<String>) -> Self {
        Self {
            category_id,
            category_name,
            product_count: 0,
            total_stock: 0,
            total_value: Decimal::ZERO,
            low_stock_count: 0,
        }
    }

    fn add(&mut self, product: &Product) -> ServiceResult<()> {
        self.total_value = add_value(self.total_value, stock_value(product)?)?;
        self.product_count += 1;
        self.total_stock += u64::from(product.stock);
        if product.is_low_stock() {
            self.low_stock_count += 1;
        }
        Ok(())
    }
}

/// One rollup per category in category order, followed by a rollup of
/// orphaned products when any exist.
pub fn category_rollups(snapshot: &Snapshot<'_>) -> ServiceResult<Vec<CategoryRollup>> {
    let mut rollups = Vec::with_capacity(snapshot.categories.len() + 1);
    for category in snapshot.categories {
        let mut rollup =
            CategoryRollup::empty(Some(category.id.clone()), Some(category.name.clone()));
        for product in snapshot
            .products
            .iter()
            .filter(|product| product.category_id == category.id)
        {
            rollup.add(product)?;
        }
        rollups.push(rollup);
    }

    let mut orphans = CategoryRollup::empty(None, None);
    for product in snapshot
        .products
        .iter()
        .filter(|product| snapshot.category(&product.category_id).is_none())
    {
        orphans.add(product)?;
    }
    if orphans.product_count > 0 {
        rollups.push(orphans);
    }
    Ok(rollups)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTrendPoint {
    pub date: NaiveDate,
    /// Short label such as `Jan 5`.
    pub label: String,
    pub stock_in: u64,
    pub stock_out: u64,
    pub net: i64,
}

/// `days` calendar-day buckets ending at `today`, oldest first.
///
/// A movement belongs to the day of its UTC timestamp. `days` must lie in
/// `1..=MAX_TREND_DAYS`.
pub fn daily_trend(
    movements: &[Movement],
    today: NaiveDate,
    days: u32,
) -> ServiceResult<Vec<DailyTrendPoint>> {
    if !(1..=MAX_TREND_DAYS).contains(&days) {
        return Err(ServiceError::InvalidInput(format!(
            "trend window must be between 1 and {} days, got {}",
            MAX_TREND_DAYS, days
        )));
    }
    (0..i64::from(days))
        .rev()
        .map(|offset| {
            let date = today
                .checked_sub_signed(Duration::days(offset))
                .ok_or_else(|| {
                    ServiceError::InvalidInput(format!("trend window ending {} starts out of range", today))
                })?;
            let totals = ledger::totals(movements.iter().filter(|m| m.day() == date));
            Ok(DailyTrendPoint {
                date,
                label: date.format("%b %-d").to_string(),
                stock_in: totals.total_in,
                stock_out: totals.total_out,
                net: totals.net,
            })
        })
        .collect()
}

/// Movements whose calendar day lies in `[from, to]`. Empty when `from > to`.
pub fn filter_by_date_range(movements: &[Movement], from: NaiveDate, to: NaiveDate) -> Vec<&Movement> {
    movements
        .iter()
        .filter(|movement| {
            let day = movement.day();
            day >= from && day <= to
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLevelDistribution {
    /// `stock > min_stock`
    pub in_stock: usize,
    /// `stock <= min_stock`, out-of-stock products included
    pub low_stock: usize,
    pub out_of_stock: usize,
}

pub fn stock_level_distribution(products: &[Product]) -> StockLevelDistribution {
    StockLevelDistribution {
        in_stock: products.iter().filter(|p| !p.is_low_stock()).count(),
        low_stock: products.iter().filter(|p| p.is_low_stock()).count(),
        out_of_stock: products.iter().filter(|p| p.is_out_of_stock()).count(),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary<'a> {
    pub total_products: usize,
    pub total_value: Decimal,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    pub distribution: StockLevelDistribution,
    pub recent_movements: Vec<&'a Movement>,
}

pub fn dashboard_summary<'a>(
    snapshot: &Snapshot<'a>,
    recent_limit: usize,
) -> ServiceResult<DashboardSummary<'a>> {
    let distribution = stock_level_distribution(snapshot.products);
    Ok(DashboardSummary {
        total_products: snapshot.products.len(),
        total_value: total_stock_value(snapshot.products)?,
        low_stock_count: distribution.low_stock,
        out_of_stock_count: distribution.out_of_stock,
        distribution,
        recent_movements: ledger::recent(snapshot.movements, recent_limit),
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementReport<'a> {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub totals: MovementTotals,
    pub movements: Vec<&'a Movement>,
}

pub fn movement_report<'a>(snapshot: &Snapshot<'a>, from: NaiveDate, to: NaiveDate) -> MovementReport<'a> {
    let movements = filter_by_date_range(snapshot.movements, from, to);
    MovementReport {
        from,
        to,
        totals: ledger::totals(movements.iter().copied()),
        movements,
    }
}

/// Stock-level filter offered on the product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StockLevelFilter {
    /// `stock > min_stock`
    In,
    /// `stock <= min_stock`
    Low,
    /// `stock == 0`
    Out,
}

impl StockLevelFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            StockLevelFilter::In => !product.is_low_stock(),
            StockLevelFilter::Low => product.is_low_stock(),
            StockLevelFilter::Out => product.is_out_of_stock(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring of name or SKU.
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub stock_level: Option<StockLevelFilter>,
}

pub fn filter_products<'a>(products: &'a [Product], filter: &ProductFilter) -> Vec<&'a Product> {
    let needle = filter
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();
    products
        .iter()
        .filter(|product| {
            needle.is_empty()
                || product.name.to_lowercase().contains(&needle)
                || product.sku.to_lowercase().contains(&needle)
        })
        .filter(|product| {
            filter
                .category_id
                .as_deref()
                .map_or(true, |id| product.category_id == id)
        })
        .filter(|product| filter.stock_level.map_or(true, |level| level.matches(product)))
        .collect()
}
