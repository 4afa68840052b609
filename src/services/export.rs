use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument};

use crate::errors::{ServiceError, ServiceResult};
use crate::models::StockStatus;
use crate::repositories::Snapshot;
use crate::services::reports;

pub const CSV_HEADER: [&str; 8] = [
    "Product Name",
    "SKU",
    "Category",
    "Current Stock",
    "Min Stock",
    "Price",
    "Total Value",
    "Status",
];

/// One line of the inventory report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    pub product_name: String,
    pub sku: String,
    pub category: String,
    pub current_stock: u32,
    pub min_stock: u32,
    pub price: Decimal,
    pub total_value: Decimal,
    pub status: StockStatus,
}

impl ExportRow {
    fn record(&self) -> [String; 8] {
        [
            self.product_name.clone(),
            self.sku.clone(),
            self.category.clone(),
            self.current_stock.to_string(),
            self.min_stock.to_string(),
            self.price.normalize().to_string(),
            self.total_value.normalize().to_string(),
            self.status.to_string(),
        ]
    }
}

/// Report rows in store order.
pub fn report_rows(snapshot: &Snapshot<'_>) -> ServiceResult<Vec<ExportRow>> {
    snapshot
        .products
        .iter()
        .map(|product| {
            Ok(ExportRow {
                product_name: product.name.clone(),
                sku: product.sku.clone(),
                category: reports::category_name(snapshot, &product.category_id).to_string(),
                current_stock: product.stock,
                min_stock: product.min_stock,
                price: product.price,
                total_value: reports::stock_value(product)?,
                status: product.stock_status(),
            })
        })
        .collect()
}

/// Writes the header and one row per product to `writer`.
pub fn write_csv<W: io::Write>(snapshot: &Snapshot<'_>, writer: W) -> ServiceResult<usize> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    let rows = report_rows(snapshot)?;
    csv_writer.write_record(CSV_HEADER)?;

    for row in &rows {
        csv_writer.write_record(row.record())?;
    }
    csv_writer
        .flush()
        .map_err(|e| ServiceError::ExportError(e.to_string()))?;
    Ok(rows.len())
}

pub fn to_csv_string(snapshot: &Snapshot<'_>) -> ServiceResult<String> {
    let mut buffer = Vec::new();
    write_csv(snapshot, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ServiceError::ExportError(e.to_string()))
}

/// `inventory-report-YYYY-MM-DD.csv`
pub fn default_file_name(date: NaiveDate) -> String {
    format!("inventory-report-{}.csv", date.format("%Y-%m-%d"))
}

/// Writes the report into `dir` under its default name and returns the path.
#[instrument(skip(snapshot))]
pub fn export_to_dir(snapshot: &Snapshot<'_>, dir: &Path, date: NaiveDate) -> ServiceResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| ServiceError::ExportError(e.to_string()))?;
    let path = dir.join(default_file_name(date));
    write_to_path(snapshot, &path)?;
    Ok(path)
}

pub fn write_to_path(snapshot: &Snapshot<'_>, path: &Path) -> ServiceResult<usize> {
    let file = File::create(path).map_err(|e| {
        ServiceError::ExportError(format!("cannot create {}: {}", path.display(), e))
    })?;
    let rows = write_csv(snapshot, file)?;
    info!(path = %path.display(), rows, "Inventory report exported");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    #[test]
    fn one_row_per_product_with_fixed_header() {
        let (products, categories) = (seed::products(), seed::categories());
        let snapshot = Snapshot {
            products: &products,
            categories: &categories,
            suppliers: &[],
            movements: &[],
        };
        let csv = to_csv_string(&snapshot).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Product Name,SKU,Category,Current Stock,Min Stock,Price,Total Value,Status"
        );
        assert_eq!(lines.len(), products.len() + 1);
        assert_eq!(
            lines[1],
            "Wireless Bluetooth Headphones,WBH-001,Electronics,45,10,99.99,4499.55,In Stock"
        );
        assert!(lines[3].ends_with(",Out of Stock"));
    }

    #[test]
    fn statuses_follow_stock_classification() {
        let products = seed::products();
        let snapshot = Snapshot {
            products: &products,
            categories: &[],
            suppliers: &[],
            movements: &[],
        };
        for (row, product) in report_rows(&snapshot).unwrap().iter().zip(&products) {
            assert_eq!(row.status, product.stock_status());
            assert_eq!(row.category, "Unknown");
        }
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let mut products = seed::products();
        products.truncate(1);
        products[0].name = "Headphones, wireless".to_string();
        products[0].price = dec!(10.00);
        let snapshot = Snapshot {
            products: &products,
            categories: &[],
            suppliers: &[],
            movements: &[],
        };
        let csv = to_csv_string(&snapshot).unwrap();
        assert_eq!(
            csv.lines().nth(1).unwrap(),
            "\"Headphones, wireless\",WBH-001,Unknown,45,10,10,450,In Stock"
        );
    }

    #[test]
    fn empty_inventory_exports_header_only() {
        let snapshot = Snapshot {
            products: &[],
            categories: &[],
            suppliers: &[],
            movements: &[],
        };
        assert_eq!(to_csv_string(&snapshot).unwrap().lines().count(), 1);
    }

    #[test]
    fn out_of_range_value_fails_without_writing() {
        let mut products = seed::products();
        products[0].price = Decimal::MAX;
        let snapshot = Snapshot {
            products: &products,
            categories: &[],
            suppliers: &[],
            movements: &[],
        };
        let mut buffer = Vec::new();
        assert_matches!(
            write_csv(&snapshot, &mut buffer),
            Err(ServiceError::ValueOverflow(_))
        );
        assert!(buffer.is_empty());
    }

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(default_file_name(date), "inventory-report-2024-03-07.csv");
    }

    #[test]
    fn export_to_dir_writes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let products = seed::products();
        let snapshot = Snapshot {
            products: &products,
            categories: &[],
            suppliers: &[],
            movements: &[],
        };
        let date = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let path = export_to_dir(&snapshot, dir.path(), date).unwrap();
        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written.lines().count(), 7);
    }
}
