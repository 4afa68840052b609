mod common;

use std::fs;

use assert_matches::assert_matches;
use inventory_ledger::{
    models::{CategoryInput, MovementType, NewMovement, ProductInput},
    repositories::{LoadIssue, PRODUCTS_KEY},
    storage::{FileStore, KeyValueStore},
    ServiceError,
};
use rust_decimal_macros::dec;
use tempfile::tempdir;

#[test]
fn first_open_seeds_and_persists_every_container() {
    let dir = tempdir().unwrap();
    let (service, report) = common::open_file_service(dir.path());

    assert!(report.is_clean());
    assert_eq!(report.seeded.len(), 4);
    assert_eq!(service.store().products().len(), 6);

    let files = FileStore::open(dir.path()).unwrap().keys().unwrap();
    assert_eq!(
        files,
        vec![
            "inventory-categories",
            "inventory-movements",
            "inventory-products",
            "inventory-suppliers",
        ]
    );
}

#[test]
fn state_survives_a_restart() {
    let dir = tempdir().unwrap();
    let (product_id, category_id) = {
        let (mut service, _) = common::open_file_service(dir.path());
        let category = service
            .create_category(CategoryInput {
                name: "Toys".into(),
                description: String::new(),
            })
            .unwrap();
        let product = service
            .create_product(ProductInput {
                name: "Yo-yo".into(),
                sku: "YY-1".into(),
                category_id: category.id.clone(),
                supplier_id: "5".into(),
                price: dec!(3.50),
                stock: 10,
                min_stock: 2,
                ..Default::default()
            })
            .unwrap();
        service
            .record_movement(NewMovement::new(&product.id, MovementType::Out, 4), "bob")
            .unwrap();
        (product.id, category.id)
    };

    let (service, report) = common::open_file_service(dir.path());
    assert!(report.seeded.is_empty());
    let product = service.store().product(&product_id).unwrap();
    assert_eq!(product.stock, 6);
    assert_eq!(product.price, dec!(3.50));
    assert!(service.store().category(&category_id).is_some());
    assert_eq!(service.store().movements().len(), 7);
    assert_eq!(service.store().movements().last().unwrap().user_id, "bob");
}

#[test]
fn emptied_containers_stay_empty_after_restart() {
    let dir = tempdir().unwrap();
    {
        let (mut service, _) = common::open_file_service(dir.path());
        for id in ["1", "2", "3", "4", "5"] {
            assert!(service.delete_supplier(id).unwrap());
        }
    }
    let (service, report) = common::open_file_service(dir.path());
    assert!(report.seeded.is_empty());
    assert!(service.store().suppliers().is_empty());
}

#[test]
fn corrupt_container_is_backed_up_and_reseeded() {
    let dir = tempdir().unwrap();
    drop(common::open_file_service(dir.path()));
    fs::write(dir.path().join("inventory-products.json"), "{not json").unwrap();

    let (service, report) = common::open_file_service(dir.path());
    assert_eq!(report.issues.len(), 1);
    assert_matches!(
        &report.issues[0],
        LoadIssue::Corrupt { key, backup_key, .. }
            if key == PRODUCTS_KEY && backup_key == "inventory-products.corrupt"
    );
    assert_matches!(
        ServiceError::from(&report.issues[0]),
        ServiceError::CorruptState { .. }
    );
    assert_eq!(service.store().products().len(), 6);

    let backup = fs::read_to_string(dir.path().join("inventory-products.corrupt.json")).unwrap();
    assert_eq!(backup, "{not json");
}

#[test]
fn legacy_blobs_with_numeric_prices_load() {
    let dir = tempdir().unwrap();
    let raw = r#"[{"id":"9","name":"Lamp","description":"","sku":"LMP-9","categoryId":"4",
        "supplierId":"4","price":12.5,"stock":3,"minStock":5,"location":"",
        "createdAt":"2024-01-15T10:00:00Z","updatedAt":"2024-01-15T10:00:00Z"}]"#;
    FileStore::open(dir.path())
        .unwrap()
        .set(PRODUCTS_KEY, raw)
        .unwrap();

    let (service, report) = common::open_file_service(dir.path());
    assert!(report.is_clean());
    let lamp = service.store().product("9").unwrap();
    assert_eq!(lamp.price, dec!(12.5));
    assert!(lamp.is_low_stock());
}
