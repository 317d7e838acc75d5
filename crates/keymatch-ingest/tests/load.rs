use std::fs;

use keymatch_ingest::{IngestError, list_columns, load_table};
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

#[test]
fn csv_keeps_codes_as_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("reference.csv");
    fs::write(
        &path,
        "\u{feff} Code ,Name,\n\n01234,Washer,x\nAB 100,Bolt\n,,\n",
    )
    .unwrap();

    let table = load_table(&path).unwrap();
    assert_eq!(table.headers(), ["Code", "Name", "Unnamed: 2"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[0], ["01234", "Washer", "x"]);
    assert_eq!(table.rows()[1], ["AB 100", "Bolt", ""]);
}

#[test]
fn csv_duplicate_headers_get_suffix() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("offer.csv");
    fs::write(&path, "sku,sku\n1,2\n").unwrap();
    assert_eq!(list_columns(&path).unwrap(), ["sku", "sku.1"]);
}

#[test]
fn empty_csv_is_empty_table() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "").unwrap();
    let table = load_table(&path).unwrap();
    assert!(table.headers().is_empty());
    assert!(table.is_empty());
}

#[test]
fn workbook_first_sheet_is_read() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("offer.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Product").unwrap();
    sheet.write_string(0, 1, "Qty").unwrap();
    sheet.write_string(1, 0, "01234").unwrap();
    sheet.write_number(1, 1, 5.0).unwrap();
    sheet.write_number(2, 0, 1234.0).unwrap();
    sheet.write_number(2, 1, 2.5).unwrap();
    let second = workbook.add_worksheet();
    second.write_string(0, 0, "ignored").unwrap();
    workbook.save(&path).unwrap();

    let table = load_table(&path).unwrap();
    assert_eq!(table.headers(), ["Product", "Qty"]);
    assert_eq!(table.rows()[0], ["01234", "5"]);
    assert_eq!(table.rows()[1], ["1234", "2.5"]);
}

#[test]
fn missing_and_unsupported_files() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.csv");
    assert!(matches!(
        load_table(&missing),
        Err(IngestError::FileNotFound { .. })
    ));

    let pdf = dir.path().join("offer.pdf");
    fs::write(&pdf, "%PDF").unwrap();
    assert!(matches!(
        load_table(&pdf),
        Err(IngestError::UnsupportedFormat { extension, .. }) if extension == "pdf"
    ));
}
