mod common;

use chrono::NaiveDate;
use common::{STOCK_XML, TYPED_XML};
use xapi_core::{
    ColumnDef, ColumnType, ConstColumnDef, Dataset, DatasetLayout, Parameter, Result, Row,
    RowType, Value, XapiOptions, XapiRoot, parse_str, write_to_string,
};

fn string_root() -> Result<XapiRoot> {
    let mut dataset = Dataset::new("members");
    dataset.add_const_column(ConstColumnDef::new("k", ColumnType::String, 5, "abcd"));
    dataset.add_column(ColumnDef::new("name", ColumnType::String, 50));
    dataset.add_column(ColumnDef::new("note", ColumnType::String, 200));

    let first = dataset.new_row();
    dataset.set_column(first, "name", "Alice")?;
    dataset.set_column(first, "note", "likes <xml> & \"quotes\"")?;

    let second = dataset.new_row();
    dataset.set_row_type(second, Some(RowType::Update))?;
    dataset.set_column(second, "name", "Bob")?;
    dataset.clear_column(second, "note")?;
    dataset.set_org_column(second, "name", "Robert")?;

    let mut root = XapiRoot::new();
    root.add_parameter(Parameter::new("service", "member"));
    root.add_parameter(Parameter::typed("method", ColumnType::String, "list"));
    root.add_parameter(Parameter::empty("cursor"));
    root.add_dataset(dataset);
    root.add_dataset(Dataset::new("empty"));
    Ok(root)
}

#[test]
fn test_string_root_round_trips_in_both_layouts() -> Result<()> {
    let root = string_root()?;
    for layout in [DatasetLayout::Wrapped, DatasetLayout::Flat] {
        let options = XapiOptions::default().with_dataset_layout(layout);
        let xml = write_to_string(&root, &options)?;
        let parsed = parse_str(&xml, &options)?;
        assert_eq!(parsed, root, "layout {layout}\n{xml}");
    }
    Ok(())
}

#[test]
fn test_empty_dataset_boundary() -> Result<()> {
    let mut root = XapiRoot::new();
    root.add_dataset(Dataset::new("empty"));
    let options = XapiOptions::default();

    let xml = write_to_string(&root, &options)?;
    assert!(!xml.contains("ColumnInfo"));
    assert!(xml.contains("<Rows/>"));

    let parsed = parse_str(&xml, &options)?;
    let dataset = parsed.get_dataset("empty").expect("dataset");
    assert_eq!(dataset.column_size(), 0);
    assert_eq!(dataset.row_size(), 0);
    assert_eq!(parsed, root);
    Ok(())
}

#[test]
fn test_rows_without_column_info_fail() {
    let xml = r#"<Root><Dataset id="d"><Rows><Row><Col id="a">1</Col></Row></Rows></Dataset></Root>"#;
    let err = parse_str(xml, &XapiOptions::default()).unwrap_err();
    assert!(err.is_invalid_xml());
    assert_eq!(err.to_string(), "ColumnInfo not found in dataset d");
}

#[test]
fn test_typed_document_is_stable() -> Result<()> {
    let options = XapiOptions::default();
    let first = parse_str(TYPED_XML, &options)?;
    let written = write_to_string(&first, &options)?;
    let second = parse_str(&written, &options)?;
    assert_eq!(first, second);
    assert_eq!(write_to_string(&second, &options)?, written);
    Ok(())
}

#[test]
fn test_stock_document_is_stable() -> Result<()> {
    let options = XapiOptions::default().with_parse_to_types(false);
    let first = parse_str(STOCK_XML, &options)?;
    let second = parse_str(&write_to_string(&first, &options)?, &options)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_blob_round_trip() -> Result<()> {
    let xml = r#"<Root><Dataset id="d"><ColumnInfo><Column id="b" type="BLOB"/></ColumnInfo>
<Rows><Row><Col id="b">SGVsbG8=</Col></Row></Rows></Dataset></Root>"#;
    let options = XapiOptions::default();
    let root = parse_str(xml, &options)?;
    let dataset = root.get_dataset("d").expect("dataset");
    assert_eq!(dataset.get_column(0, "b")?, Some(&Value::Bytes(b"Hello".to_vec())));

    let written = write_to_string(&root, &options)?;
    assert!(written.contains(r#"<Col id="b">SGVsbG8=</Col>"#));
    Ok(())
}

#[test]
fn test_invalid_date_survives_round_trip() -> Result<()> {
    let xml = r#"<Root><Dataset id="d"><ColumnInfo><Column id="when" type="DATE"/></ColumnInfo>
<Rows><Row><Col id="when">20230230</Col></Row></Rows></Dataset></Root>"#;
    let options = XapiOptions::default();
    let root = parse_str(xml, &options)?;
    let dataset = root.get_dataset("d").expect("dataset");
    assert_eq!(dataset.get_column(0, "when")?, Some(&Value::from("20230230")));
    assert!(write_to_string(&root, &options)?.contains(">20230230<"));
    Ok(())
}

#[test]
fn test_datetime_with_milliseconds() -> Result<()> {
    let when = NaiveDate::from_ymd_opt(2024, 2, 29)
        .and_then(|d| d.and_hms_milli_opt(23, 59, 58, 7))
        .expect("datetime");
    let mut dataset = Dataset::new("d");
    dataset.add_column(ColumnDef::new("at", ColumnType::DateTime, 17));
    let mut row = Row::new();
    row.set_col(0, xapi_core::Col::new("at", Some(Value::DateTime(when))));
    dataset.add_row(row);
    let mut root = XapiRoot::new();
    root.add_dataset(dataset);

    let options = XapiOptions::default();
    let xml = write_to_string(&root, &options)?;
    assert!(xml.contains(">20240229235958007<"));
    assert_eq!(parse_str(&xml, &options)?, root);
    Ok(())
}

#[test]
fn test_whitespace_only_strings_round_trip() -> Result<()> {
    let mut dataset = Dataset::new("blank");
    dataset.add_column(ColumnDef::new("a", ColumnType::String, 10));
    for text in ["   ", "\n", " \t "] {
        let row = dataset.new_row();
        dataset.set_column(row, "a", text)?;
    }
    let mut root = XapiRoot::new();
    root.add_dataset(dataset);

    let options = XapiOptions::default();
    let parsed = parse_str(&write_to_string(&root, &options)?, &options)?;
    let dataset = parsed.get_dataset("blank").expect("dataset");
    assert_eq!(dataset.get_column(0, "a")?, Some(&Value::from("   ")));
    assert_eq!(dataset.get_column(1, "a")?, Some(&Value::from("\n")));
    assert_eq!(dataset.get_column(2, "a")?, Some(&Value::from(" \t ")));
    assert_eq!(parsed, root);
    Ok(())
}

#[test]
fn test_whitespace_only_parameter_text() -> Result<()> {
    let xml = r#"<Root><Parameters><Parameter id="p"> </Parameter></Parameters></Root>"#;
    let root = parse_str(xml, &XapiOptions::default())?;
    let parameter = root.get_parameter("p").expect("parameter");
    assert_eq!(parameter.value, Some(Value::from(" ")));
    Ok(())
}
