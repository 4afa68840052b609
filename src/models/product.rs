use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use validator::{Validate, ValidationError};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Case-sensitive; uniqueness is not enforced.
    pub sku: String,
    pub category_id: String,
    pub supplier_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: u32,
    pub min_stock: u32,
    #[serde(default)]
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stock classification shown on reports and in the CSV export.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum StockStatus {
    #[serde(rename = "In Stock")]
    #[strum(serialize = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    #[strum(serialize = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    #[strum(serialize = "Out of Stock")]
    OutOfStock,
}

impl StockStatus {
    pub fn classify(stock: u32, min_stock: u32) -> Self {
        if stock == 0 {
            StockStatus::OutOfStock
        } else if stock <= min_stock {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

impl Product {
    /// Builds a product from validated form input.
    pub fn from_input(id: String, input: ProductInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            sku: input.sku,
            category_id: input.category_id,
            supplier_id: input.supplier_id,
            price: input.price,
            stock: input.stock,
            min_stock: input.min_stock,
            location: input.location,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every editable field, keeping `id` and `created_at`.
    pub fn apply_input(&mut self, input: ProductInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.description = input.description;
        self.sku = input.sku;
        self.category_id = input.category_id;
        self.supplier_id = input.supplier_id;
        self.price = input.price;
        self.stock = input.stock;
        self.min_stock = input.min_stock;
        self.location = input.location;
        self.updated_at = now;
    }

    /// `stock <= min_stock`; includes products that are out of stock.
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }

    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.stock, self.min_stock)
    }

    /// `price * stock`, or `None` when the product is outside the decimal range.
    pub fn total_value(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.stock))
    }
}

/// Editable product fields as submitted from a form or the CLI.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    pub category_id: String,
    pub supplier_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "validate_price")]
    pub price: Decimal,
    pub stock: u32,
    pub min_stock: u32,
    #[serde(default)]
    pub location: String,
}

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            sku: product.sku.clone(),
            category_id: product.category_id.clone(),
            supplier_id: product.supplier_id.clone(),
            price: product.price,
            stock: product.stock,
            min_stock: product.min_stock,
            location: product.location.clone(),
        }
    }
}

/// Highest unit price accepted from input.
pub const MAX_PRICE: i64 = 1_000_000_000;

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        let mut err = ValidationError::new("price");
        err.message = Some("price must not be negative".into());
        return Err(err);
    }
    if *price > Decimal::from(MAX_PRICE) {
        let mut err = ValidationError::new("price");
        err.message = Some(format!("price must not exceed {}", MAX_PRICE).into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(8, 15, StockStatus::LowStock)]
    #[case(0, 5, StockStatus::OutOfStock)]
    #[case(0, 0, StockStatus::OutOfStock)]
    #[case(22, 8, StockStatus::InStock)]
    #[case(10, 10, StockStatus::LowStock)]
    #[case(11, 10, StockStatus::InStock)]
    fn classifies_stock(#[case] stock: u32, #[case] min_stock: u32, #[case] expected: StockStatus) {
        assert_eq!(StockStatus::classify(stock, min_stock), expected);
    }

    #[test]
    fn status_labels_match_report_wording() {
        assert_eq!(StockStatus::OutOfStock.to_string(), "Out of Stock");
        assert_eq!(StockStatus::LowStock.to_string(), "Low Stock");
        assert_eq!(StockStatus::InStock.to_string(), "In Stock");
        assert_eq!(
            serde_json::to_value(StockStatus::LowStock).unwrap(),
            serde_json::json!("Low Stock")
        );
    }

    #[test]
    fn deserializes_camel_case_with_numeric_price() {
        let raw = r#"{
            "id": "1",
            "name": "Wireless Bluetooth Headphones",
            "description": "High-quality wireless headphones",
            "sku": "WBH-001",
            "categoryId": "1",
            "supplierId": "1",
            "price": 99.99,
            "stock": 45,
            "minStock": 10,
            "location": "A1-B2",
            "createdAt": "2024-01-15T10:00:00Z",
            "updatedAt": "2024-01-15T10:00:00Z"
        }"#;
        let product: Product = serde_json::from_str(raw).unwrap();
        assert_eq!(product.price, dec!(99.99));
        assert_eq!(product.min_stock, 10);
        assert_eq!(product.total_value(), Some(dec!(4499.55)));

        let value = serde_json::to_value(&product).unwrap();
        assert!(value["price"].is_number());
        assert_eq!(value["categoryId"], "1");
    }

    #[test]
    fn negative_stock_is_rejected_at_decode() {
        let raw = r#"{"id":"1","name":"x","sku":"s","categoryId":"1","supplierId":"1",
            "price":1,"stock":-3,"minStock":0,
            "createdAt":"2024-01-15T10:00:00Z","updatedAt":"2024-01-15T10:00:00Z"}"#;
        assert!(serde_json::from_str::<Product>(raw).is_err());
    }

    #[test]
    fn input_validation_rejects_negative_price_and_blank_sku() {
        let input = ProductInput {
            name: "Cable".into(),
            sku: String::new(),
            price: dec!(-1.00),
            ..Default::default()
        };
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("sku"));
    }

    #[test]
    fn price_above_ceiling_is_rejected() {
        let mut input = ProductInput {
            name: "Cable".into(),
            sku: "C-1".into(),
            price: Decimal::from(MAX_PRICE),
            ..Default::default()
        };
        assert!(input.validate().is_ok());

        input.price = Decimal::MAX;
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
    }

    #[test]
    fn total_value_reports_overflow_instead_of_panicking() {
        let raw = r#"{"id":"1","name":"x","sku":"s","categoryId":"1","supplierId":"1",
            "price":1,"stock":2,"minStock":0,
            "createdAt":"2024-01-15T10:00:00Z","updatedAt":"2024-01-15T10:00:00Z"}"#;
        let mut product: Product = serde_json::from_str(raw).unwrap();
        assert_eq!(product.total_value(), Some(dec!(2)));

        product.price = Decimal::MAX;
        assert_eq!(product.total_value(), None);
    }
}
