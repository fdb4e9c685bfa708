use super::*;
use crate::data::{Column, DataType, Table, Value};
use crate::{write_rdata, write_rds, RFrameError};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int32Array, StringArray, UInt32Array};
use arrow::datatypes::{DataType as ArrowDataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use std::path::Path;
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn mixed_table() -> Table {
    let d = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let dt = d.and_hms_opt(12, 30, 0).unwrap();
    Table::try_new(vec![
        Column::from_values("id", DataType::Int32, vec![Value::Int32(1), Value::Null, Value::Int32(3)]),
        Column::from_values("score", DataType::Float64, vec![0.5.into(), Value::Null, 2.25.into()]),
        Column::from_values("ok", DataType::Bool, vec![true.into(), false.into(), Value::Null]),
        Column::object("label", vec!["a".into(), "b".into(), Value::Null]),
        Column::object("mixed", vec!["a".into(), Value::Int64(1), Value::Bool(true)]),
        Column::object("day", vec![Value::Date(d), Value::Null, Value::Date(d)]),
        Column::from_values("at", DataType::TimestampNs, vec![Value::DateTime(dt), Value::Null, Value::Null]),
        Column::object("empty", vec![Value::Null, Value::Null, Value::Null]),
    ])
    .unwrap()
}

#[test]
fn test_plan_tags_and_primitives() {
    let plan = WriteOrchestrator::plan(&mixed_table(), &ColumnClassifier::default());
    let tags: Vec<SemanticTag> = plan.iter().map(|p| p.class.tag).collect();
    assert_eq!(
        tags,
        vec![
            SemanticTag::Integer,
            SemanticTag::Numeric,
            SemanticTag::Logical,
            SemanticTag::Character,
            SemanticTag::Object,
            SemanticTag::Date,
            SemanticTag::DateTime,
            SemanticTag::Logical,
        ]
    );
    let primitives: Vec<StoragePrimitive> = plan.iter().map(|p| p.primitive).collect();
    assert_eq!(primitives, tags_to_primitives(&tags));
    assert!(plan.iter().all(|p| p.class.has_missing || p.name == "mixed"));
}

#[test]
fn test_write_rdata_end_to_end() {
    init_logging();
    let table = mixed_table();
    let snapshot = table.clone();
    let mut writer = MemoryWriter::new();

    write_rdata(&mut writer, "frame.RData", &table, &WriteOptions::default().with_object_name("frame")).unwrap();

    // Caller's table is never mutated
    assert_eq!(table, snapshot);

    let obj = writer.last().unwrap();
    assert_eq!(obj.format, FileFormat::RData);
    assert_eq!(obj.name.as_deref(), Some("frame"));
    assert_eq!(obj.row_count, 3);
    assert_eq!(obj.column_names(), table.column_names());

    let id = obj.column("id").unwrap();
    assert_eq!(id.primitive, StoragePrimitive::Integer);
    assert_eq!(id.values, vec![CellValue::Int(1), CellValue::Int(NA_INTEGER), CellValue::Int(3)]);

    let score = obj.column("score").unwrap();
    assert_eq!(score.primitive, StoragePrimitive::Numeric);
    assert_eq!(score.values, vec![CellValue::Real(0.5), CellValue::Missing, CellValue::Real(2.25)]);

    let ok = obj.column("ok").unwrap();
    assert_eq!(ok.primitive, StoragePrimitive::Logical);
    assert_eq!(ok.values, vec![CellValue::Int(1), CellValue::Int(0), CellValue::Int(NA_INTEGER)]);

    let mixed = obj.column("mixed").unwrap();
    assert_eq!(mixed.primitive, StoragePrimitive::Character);
    assert_eq!(
        mixed.values,
        vec![CellValue::Text("a".into()), CellValue::Text("1".into()), CellValue::Text("true".into())]
    );

    let day = obj.column("day").unwrap();
    assert_eq!(day.primitive, StoragePrimitive::Character);
    assert_eq!(day.values[0], CellValue::Text("2020-01-01".into()));
    assert_eq!(day.values[1], CellValue::Missing);

    let at = obj.column("at").unwrap();
    assert_eq!(at.values[0], CellValue::Text("2020-01-01 12:30:00".into()));

    let empty = obj.column("empty").unwrap();
    assert_eq!(empty.primitive, StoragePrimitive::Logical);
    assert!(empty.values.iter().all(|v| *v == CellValue::Int(NA_INTEGER)));
}

#[test]
fn test_call_sequence_order() {
    let table = Table::try_new(vec![
        Column::from_values("b", DataType::Int16, vec![Value::Int16(1), Value::Int16(2)]),
        Column::object("a", vec!["x".into(), "y".into()]),
    ])
    .unwrap();
    let mut writer = MemoryWriter::new();
    write_rds(&mut writer, "t.rds", &table, &WriteOptions::default()).unwrap();

    let expected = vec![
        WriterCall::Open {
            path: Path::new("t.rds").to_path_buf(),
            format: FileFormat::Rds,
        },
        WriterCall::SetRowCount(2),
        WriterCall::SetTableName(String::new()),
        WriterCall::AddColumn {
            name: "b".into(),
            primitive: StoragePrimitive::Integer,
        },
        WriterCall::AddColumn {
            name: "a".into(),
            primitive: StoragePrimitive::Character,
        },
        WriterCall::InsertValue { row: 0, column: 0 },
        WriterCall::InsertValue { row: 1, column: 0 },
        WriterCall::InsertValue { row: 0, column: 1 },
        WriterCall::InsertValue { row: 1, column: 1 },
        WriterCall::Close,
    ];
    assert_eq!(writer.calls(), expected.as_slice());
}

#[test]
fn test_writer_failure_aborts_and_closes() {
    init_logging();
    let mut writer = MemoryWriter::new().fail_at(WriterStep::InsertValue);
    let err = write_rds(&mut writer, "t.rds", &mixed_table(), &WriteOptions::default()).unwrap_err();
    assert!(matches!(err, RFrameError::Writer(_)));

    // Exactly one insert was attempted, then the handle was released
    let inserts = writer
        .calls()
        .iter()
        .filter(|c| matches!(c, WriterCall::InsertValue { .. }))
        .count();
    assert_eq!(inserts, 1);
    assert_eq!(writer.calls().last(), Some(&WriterCall::Close));
    assert!(!writer.is_open());
    assert!(writer.objects().is_empty());
}

#[test]
fn test_open_failure_propagates() {
    let mut writer = MemoryWriter::new().fail_at(WriterStep::Open);
    let err = write_rdata(&mut writer, "/nowhere/t.RData", &mixed_table(), &WriteOptions::default()).unwrap_err();
    assert!(matches!(err, RFrameError::Io(_)));
    assert!(!err.is_validation());
    assert_eq!(writer.calls().len(), 1);
}

#[test]
fn test_close_failure_propagates() {
    let mut writer = MemoryWriter::new().fail_at(WriterStep::Close);
    let err = write_rds(&mut writer, "t.rds", &mixed_table(), &WriteOptions::default()).unwrap_err();
    assert!(matches!(err, RFrameError::Io(_)));
}

#[test]
fn test_inconsistent_classification_table() {
    // Text routed to INTEGER: the transformer reports an internal fault
    let mut table = ClassificationTable::v1();
    table.integer.push(DataType::Utf8);
    let options = WriteOptions::default().with_classification(table);
    let frame = Table::try_new(vec![Column::object("s", vec!["x".into()])]).unwrap();

    let mut writer = MemoryWriter::new();
    let err = write_rds(&mut writer, "t.rds", &frame, &options).unwrap_err();
    assert!(matches!(err, RFrameError::Internal(_)));
    assert_eq!(writer.calls().last(), Some(&WriterCall::Close));
}

#[test]
fn test_zero_row_table() {
    let table = Table::try_new(vec![
        Column::object("o", Vec::new()),
        Column::new("n", DataType::Float64),
    ])
    .unwrap();
    let plan = WriteOrchestrator::plan(&table, &ColumnClassifier::default());
    assert_eq!(plan[0].class, ColumnClass::new(SemanticTag::Logical, false));

    let mut writer = MemoryWriter::new();
    write_rds(&mut writer, "t.rds", &table, &WriteOptions::default()).unwrap();
    let obj = writer.last().unwrap();
    assert_eq!(obj.row_count, 0);
    assert_eq!(obj.columns.len(), 2);
    assert!(obj.columns.iter().all(|c| c.values.is_empty()));
}

#[test]
fn test_custom_formats() {
    let d = NaiveDate::from_ymd_opt(2021, 3, 4).unwrap();
    let table = Table::try_new(vec![
        Column::object("d", vec![Value::Date(d)]),
        Column::object("t", vec![Value::DateTime(d.and_hms_opt(5, 6, 7).unwrap())]),
    ])
    .unwrap();
    let options = WriteOptions::default()
        .with_date_format("%d/%m/%Y")
        .with_datetime_format("%Y%m%dT%H%M%S");

    let mut writer = MemoryWriter::new();
    write_rds(&mut writer, "t.rds", &table, &options).unwrap();
    let obj = writer.last().unwrap();
    assert_eq!(obj.column("d").unwrap().values, vec![CellValue::Text("04/03/2021".into())]);
    assert_eq!(obj.column("t").unwrap().values, vec![CellValue::Text("20210304T050607".into())]);
}

#[test]
fn test_round_trip_from_record_batch() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("i", ArrowDataType::Int32, true),
        Field::new("u", ArrowDataType::UInt32, false),
        Field::new("f", ArrowDataType::Float64, true),
        Field::new("b", ArrowDataType::Boolean, true),
        Field::new("s", ArrowDataType::Utf8, true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int32Array::from(vec![Some(7), None, Some(-1)])),
        Arc::new(UInt32Array::from(vec![u32::MAX, 0, 1])),
        Arc::new(Float64Array::from(vec![Some(1.5), Some(f64::NAN), None])),
        Arc::new(BooleanArray::from(vec![Some(true), None, Some(false)])),
        Arc::new(StringArray::from(vec![Some("x"), Some("y"), None])),
    ];
    let batch = RecordBatch::try_new(schema, columns).unwrap();
    let table = Table::try_from(&batch).unwrap();

    let mut writer = MemoryWriter::new();
    write_rdata(&mut writer, "batch.RData", &table, &WriteOptions::default()).unwrap();
    let obj = writer.last().unwrap();

    assert_eq!(obj.row_count, batch.num_rows());
    assert_eq!(obj.column_names(), vec!["i", "u", "f", "b", "s"]);

    let i = obj.column("i").unwrap();
    assert_eq!(i.primitive, StoragePrimitive::Integer);
    assert_eq!(i.values, vec![CellValue::Int(7), CellValue::Int(NA_INTEGER), CellValue::Int(-1)]);

    // Unsigned 32-bit goes to NUMERIC to keep the full range
    let u = obj.column("u").unwrap();
    assert_eq!(u.primitive, StoragePrimitive::Numeric);
    assert_eq!(u.values[0], CellValue::Real(u32::MAX as f64));

    let f = obj.column("f").unwrap();
    assert!(f.values[1].as_f64().unwrap().is_nan());
    assert_eq!(f.values[2], CellValue::Missing);

    let b = obj.column("b").unwrap();
    assert_eq!(b.primitive, StoragePrimitive::Logical);
    assert_eq!(b.values, vec![CellValue::Int(1), CellValue::Int(NA_INTEGER), CellValue::Int(0)]);

    let s = obj.column("s").unwrap();
    assert_eq!(s.primitive, StoragePrimitive::Character);
    assert_eq!(s.values, vec![CellValue::Text("x".into()), CellValue::Text("y".into()), CellValue::Missing]);
}

#[test]
fn test_several_objects_in_sequence() {
    let mut writer = MemoryWriter::new();
    let table = mixed_table();
    write_rdata(&mut writer, "a.RData", &table, &WriteOptions::default()).unwrap();
    write_rds(&mut writer, "b.rds", &table, &WriteOptions::default()).unwrap();
    let objects = writer.into_objects();
    assert_eq!(objects.len(), 2);
    assert_eq!(objects[0].format, FileFormat::RData);
    assert_eq!(objects[1].format, FileFormat::Rds);
    assert_eq!(objects[0].columns, objects[1].columns);
}
