// ==========================================
// End-to-end: file -> column resolution -> database
// ==========================================


use brand_backfill::importer::ImportError;
use brand_backfill::repository::RepositoryError;
use brand_backfill::{run_backfill, BackfillRequest, ReconcileError};
use std::path::PathBuf;
use test_helpers::*;

fn request(input: PathBuf, dry_run: bool) -> BackfillRequest {
    BackfillRequest {
        input,
        sheet: None,
        dry_run,
    }
}

#[test]
fn test_csv_backfill_end_to_end() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared(&db_path);
    let globex = insert_brand(&conn, "Globex", "globex");
    insert_product(&conn, "SKU1", None);
    insert_product(&conn, "SKU2", Some(globex));
    insert_product(&conn, "SKU3", None);

    let csv = write_csv(
        "\u{feff}STT,Mã hàng hóa,Tên hàng,Nhãn hàng\n\
         1,SKU1,Sữa tươi,Vinamilk\n\
         2,SKU2,Bánh,Kinh Đô\n\
         ,,,\n\
         4,SKU3,Sữa chua,Vinamilk\n\
         5,SKU404,Kẹo,Hải Hà\n",
    );

    let outcome = run_backfill(&config_for(&db_path), &request(csv.path().to_path_buf(), false)).unwrap();

    assert_eq!(outcome.brands_created, 1);
    assert_eq!(outcome.products_updated, 2);
    assert_eq!(outcome.products_skipped, 3);
    assert_eq!(outcome.skip_breakdown.blank_cell, 1);
    assert_eq!(outcome.skip_breakdown.product_not_found, 1);
    assert_eq!(outcome.skip_breakdown.brand_already_set, 1);
    assert_eq!(outcome.errors, 0);

    let all = brands(&conn);
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].1, "Vinamilk");
    assert_eq!(all[1].2, "vinamilk");
    assert_eq!(product_brand(&conn, "SKU1"), Some(all[1].0));
    assert_eq!(product_brand(&conn, "SKU3"), Some(all[1].0));
    assert_eq!(product_brand(&conn, "SKU2"), Some(globex));
}

#[test]
fn test_english_headers_resolved_case_insensitively() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared(&db_path);
    insert_product(&conn, "SKU1", None);

    let csv = write_csv("PRODUCTCODE,BRAND\nSKU1,Acme\n");
    let outcome = run_backfill(&config_for(&db_path), &request(csv.path().to_path_buf(), false)).unwrap();

    assert_eq!(outcome.products_updated, 1);
    assert!(product_brand(&conn, "SKU1").is_some());
}

#[test]
fn test_missing_input_column_is_fatal() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared(&db_path);
    insert_product(&conn, "SKU1", None);

    let csv = write_csv("code,maker\nSKU1,Acme\n");
    let err = run_backfill(&config_for(&db_path), &request(csv.path().to_path_buf(), false)).unwrap_err();

    match err {
        ReconcileError::Import(ImportError::ColumnNotFound { found, .. }) => {
            assert_eq!(found, vec!["code", "maker"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(brands(&conn).is_empty());
    assert_eq!(product_brand(&conn, "SKU1"), None);
}

#[test]
fn test_missing_schema_column_is_fatal() {
    let (_tmp, db_path) = create_test_db().unwrap();
    {
        let conn = open_shared(&db_path);
        conn.lock()
            .unwrap()
            .execute_batch(
                "DROP TABLE products;
                 CREATE TABLE products (id INTEGER PRIMARY KEY, product_code TEXT, manufacturer INTEGER);",
            )
            .unwrap();
    }

    let csv = write_csv("Mã hàng hóa,Nhãn hàng\nSKU1,Acme\n");
    let err = run_backfill(&config_for(&db_path), &request(csv.path().to_path_buf(), false)).unwrap_err();

    assert!(matches!(
        err,
        ReconcileError::Repository(RepositoryError::ColumnNotFound { ref found, .. })
            if found.contains(&"manufacturer".to_string())
    ));
}

#[test]
fn test_missing_database_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("absent.db");
    let csv = write_csv("Mã hàng hóa,Nhãn hàng\nSKU1,Acme\n");

    let err = run_backfill(
        &config_for(db_path.to_str().unwrap()),
        &request(csv.path().to_path_buf(), false),
    )
    .unwrap_err();

    assert!(matches!(err, ReconcileError::DatabaseOpen { .. }));
    assert!(!db_path.exists());
}

#[test]
fn test_unsupported_input_extension_is_fatal() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let input = tempfile::Builder::new().suffix(".json").tempfile().unwrap();

    let err = run_backfill(&config_for(&db_path), &request(input.path().to_path_buf(), false)).unwrap_err();
    assert!(matches!(err, ReconcileError::Import(ImportError::UnsupportedFormat(_))));
}

#[test]
fn test_dry_run_leaves_database_untouched() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared(&db_path);
    insert_product(&conn, "SKU1", None);
    insert_product(&conn, "SKU2", None);
    let before = products(&conn);

    let csv = write_csv("Mã hàng hóa,Nhãn hàng\nSKU1,Acme\nSKU2,Acme\n");
    let outcome = run_backfill(&config_for(&db_path), &request(csv.path().to_path_buf(), true)).unwrap();

    assert!(outcome.dry_run);
    assert_eq!(outcome.brands_created, 1);
    assert_eq!(outcome.products_updated, 2);
    assert!(brands(&conn).is_empty());
    assert_eq!(products(&conn), before);
    assert!(outcome.to_string().contains("dry run"));
}
