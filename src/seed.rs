//! Starter dataset used when a container has never been persisted.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{Category, Movement, MovementType, Product, Supplier};

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap()
}

pub fn categories() -> Vec<Category> {
    [
        ("1", "Electronics", "Electronic devices and components"),
        ("2", "Clothing", "Apparel and accessories"),
        ("3", "Books", "Books and publications"),
        ("4", "Home & Garden", "Home improvement and gardening supplies"),
        ("5", "Sports", "Sports equipment and accessories"),
    ]
    .into_iter()
    .map(|(id, name, description)| Category {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    })
    .collect()
}

pub fn suppliers() -> Vec<Supplier> {
    [
        (
            "1",
            "TechCorp Inc.",
            "John Smith",
            "john@techcorp.com",
            "+1-555-0101",
            "123 Tech Street, Silicon Valley, CA",
        ),
        (
            "2",
            "Fashion Forward",
            "Sarah Johnson",
            "sarah@fashionforward.com",
            "+1-555-0102",
            "456 Fashion Ave, New York, NY",
        ),
        (
            "3",
            "BookWorld",
            "Mike Wilson",
            "mike@bookworld.com",
            "+1-555-0103",
            "789 Library Lane, Boston, MA",
        ),
        (
            "4",
            "Garden Plus",
            "Lisa Brown",
            "lisa@gardenplus.com",
            "+1-555-0104",
            "321 Green Street, Portland, OR",
        ),
        (
            "5",
            "SportZone",
            "David Lee",
            "david@sportzone.com",
            "+1-555-0105",
            "654 Athletic Blvd, Denver, CO",
        ),
    ]
    .into_iter()
    .map(|(id, name, contact, email, phone, address)| Supplier {
        id: id.to_string(),
        name: name.to_string(),
        contact: contact.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        address: address.to_string(),
    })
    .collect()
}

struct SeedProduct {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    sku: &'static str,
    category_id: &'static str,
    supplier_id: &'static str,
    price: Decimal,
    stock: u32,
    min_stock: u32,
    location: &'static str,
    day: u32,
    hour: u32,
}

pub fn products() -> Vec<Product> {
    let rows = [
        SeedProduct {
            id: "1",
            name: "Wireless Bluetooth Headphones",
            description: "High-quality wireless headphones with noise cancellation",
            sku: "WBH-001",
            category_id: "1",
            supplier_id: "1",
            price: dec!(99.99),
            stock: 45,
            min_stock: 10,
            location: "A1-B2",
            day: 15,
            hour: 10,
        },
        SeedProduct {
            id: "2",
            name: "Cotton T-Shirt",
            description: "100% organic cotton t-shirt, available in multiple colors",
            sku: "CTS-001",
            category_id: "2",
            supplier_id: "2",
            price: dec!(24.99),
            stock: 8,
            min_stock: 15,
            location: "B2-C3",
            day: 16,
            hour: 11,
        },
        SeedProduct {
            id: "3",
            name: "JavaScript Programming Guide",
            description: "Comprehensive guide to modern JavaScript development",
            sku: "JSG-001",
            category_id: "3",
            supplier_id: "3",
            price: dec!(39.99),
            stock: 0,
            min_stock: 5,
            location: "C3-D4",
            day: 17,
            hour: 12,
        },
        SeedProduct {
            id: "4",
            name: "Garden Hose 50ft",
            description: "Durable 50-foot garden hose with spray nozzle",
            sku: "GH-050",
            category_id: "4",
            supplier_id: "4",
            price: dec!(34.99),
            stock: 22,
            min_stock: 8,
            location: "D4-E5",
            day: 18,
            hour: 13,
        },
        SeedProduct {
            id: "5",
            name: "Basketball",
            description: "Official size basketball for indoor and outdoor use",
            sku: "BB-001",
            category_id: "5",
            supplier_id: "5",
            price: dec!(29.99),
            stock: 3,
            min_stock: 10,
            location: "E5-F6",
            day: 19,
            hour: 14,
        },
        SeedProduct {
            id: "6",
            name: "Smartphone Case",
            description: "Protective case for latest smartphone models",
            sku: "SPC-001",
            category_id: "1",
            supplier_id: "1",
            price: dec!(19.99),
            stock: 67,
            min_stock: 20,
            location: "A1-B1",
            day: 20,
            hour: 15,
        },
    ];

    rows.into_iter()
        .map(|row| {
            let stamp = at(2024, 1, row.day, row.hour, 0);
            Product {
                id: row.id.to_string(),
                name: row.name.to_string(),
                description: row.description.to_string(),
                sku: row.sku.to_string(),
                category_id: row.category_id.to_string(),
                supplier_id: row.supplier_id.to_string(),
                price: row.price,
                stock: row.stock,
                min_stock: row.min_stock,
                location: row.location.to_string(),
                created_at: stamp,
                updated_at: stamp,
            }
        })
        .collect()
}

pub fn movements() -> Vec<Movement> {
    [
        ("1", "1", MovementType::In, 50, "Purchase", "Initial stock purchase", at(2024, 1, 15, 10, 30)),
        ("2", "1", MovementType::Out, 5, "Sale", "Sold to customer", at(2024, 1, 16, 14, 20)),
        ("3", "2", MovementType::In, 25, "Purchase", "Restocking popular item", at(2024, 1, 16, 11, 30)),
        ("4", "2", MovementType::Out, 17, "Sale", "Bulk order", at(2024, 1, 17, 16, 45)),
        ("5", "3", MovementType::In, 15, "Purchase", "New edition arrival", at(2024, 1, 17, 12, 30)),
        ("6", "3", MovementType::Out, 15, "Sale", "All copies sold out", at(2024, 1, 18, 18, 0)),
    ]
    .into_iter()
    .map(|(id, product_id, movement_type, quantity, reason, notes, date)| Movement {
        id: id.to_string(),
        product_id: product_id.to_string(),
        movement_type,
        quantity,
        reason: reason.to_string(),
        notes: notes.to_string(),
        date,
        user_id: "user1".to_string(),
    })
    .collect()
}
