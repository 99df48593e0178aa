use std::path::PathBuf;

use harmonizer_model::{DataType, Field, Schema, Section, Vocabulary};
use harmonizer_schema::{
    ColumnRole, SchemaError, TemplateManifest, compile, load_schema, load_schema_json,
};

fn templates_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

fn schema_of(fields: Vec<Field>) -> Schema {
    let mut section = Section::new("main");
    section.fields = fields;
    Schema::new(vec![section])
}

fn bins() -> Vocabulary {
    Vocabulary::from_labels(["0 - 9", "10 - 19", "20+"])
}

#[test]
fn demo_template_compiles_with_companions() {
    let manifest = TemplateManifest::load(&templates_root()).expect("load manifest");
    let entry = manifest.find("demo").expect("demo template");
    let schema = load_schema(&TemplateManifest::schema_path(&templates_root(), entry))
        .expect("load demo schema");
    let compiled = compile(&schema).expect("compile demo schema");

    let age = compiled.column_of("host age").unwrap();
    assert_eq!(
        compiled.role(age),
        ColumnRole::Base {
            unit: Some(age + 1),
            bin: Some(age + 2)
        }
    );
    assert_eq!(compiled.role(age + 1), ColumnRole::Unit { base: age });
    assert_eq!(compiled.role(age + 2), ColumnRole::Bin { base: age });

    let date = compiled.column_of("sample collection date").unwrap();
    assert_eq!(
        compiled.role(date),
        ColumnRole::Base {
            unit: Some(date + 1),
            bin: None
        }
    );

    let origin = compiled.column_of("host origin geo_loc name (country)").unwrap();
    assert_eq!(
        compiled.field(origin).unwrap().flat_vocabulary,
        vec!["Not Applicable", "Canada", "United States of America"]
    );

    let collector = compiled.column_of("sample collected by").unwrap();
    assert_eq!(
        compiled.field(collector).unwrap().flat_vocabulary,
        vec![
            "Alberta Precision Labs (APL)",
            "BCCDC Public Health Laboratory",
            "Public Health Ontario (PHO)",
            "  Toronto PHO",
            "  Kingston PHO",
        ]
    );
}

#[test]
fn draft_sheet_template_loads() {
    let manifest = TemplateManifest::load(&templates_root()).expect("load manifest");
    let entry = manifest
        .templates(true)
        .find(|t| t.schema.as_deref() == Some("data.tsv"))
        .expect("sheet template");
    let schema = load_schema(&TemplateManifest::schema_path(&templates_root(), entry))
        .expect("load sheet");
    let compiled = compile(&schema).expect("compile sheet");
    let gender = compiled.column_of("host gender").unwrap();
    assert_eq!(
        compiled.field(gender).unwrap().flat_vocabulary,
        vec!["Female", "  Trans Female", "Male"]
    );
    assert!(matches!(
        compiled.role(compiled.column_of("host age").unwrap()),
        ColumnRole::Base { unit: Some(_), bin: Some(_) }
    ));
}

#[test]
fn detached_unit_is_rejected() {
    let schema = schema_of(vec![
        Field::new("age", DataType::Decimal),
        Field::new("weight", DataType::Decimal),
        Field::new("age unit", DataType::Select),
    ]);
    match compile(&schema) {
        Err(SchemaError::DetachedCompanion { field, base }) => {
            assert_eq!(field, "age unit");
            assert_eq!(base, "age");
        }
        other => panic!("expected detached companion, got {other:?}"),
    }
}

#[test]
fn bin_after_unit_is_attached() {
    let schema = schema_of(vec![
        Field::new("age", DataType::Decimal),
        Field::new("age unit", DataType::Select),
        Field::new("age bin", DataType::Select).with_vocabulary(bins()),
    ]);
    assert!(compile(&schema).is_ok());

    let detached = schema_of(vec![
        Field::new("age", DataType::Decimal),
        Field::new("other", DataType::Text),
        Field::new("age bin", DataType::Select).with_vocabulary(bins()),
    ]);
    assert!(matches!(
        compile(&detached),
        Err(SchemaError::DetachedCompanion { .. })
    ));
}

#[test]
fn bin_without_vocabulary_is_rejected() {
    let schema = schema_of(vec![
        Field::new("age", DataType::Decimal),
        Field::new("age bin", DataType::Select),
    ]);
    assert!(matches!(
        compile(&schema),
        Err(SchemaError::BinWithoutVocabulary { .. })
    ));
}

#[test]
fn companion_names_without_base_are_plain() {
    let schema = schema_of(vec![
        Field::new("dose unit", DataType::Select),
        Field::new("score bin", DataType::Select),
    ]);
    let compiled = compile(&schema).unwrap();
    assert_eq!(compiled.role(0), ColumnRole::Plain);
    assert_eq!(compiled.role(1), ColumnRole::Plain);
}

#[test]
fn json_errors_carry_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = load_schema_json(&path).unwrap_err();
    assert!(matches!(err, SchemaError::Json { .. }));
    assert!(err.to_string().contains("broken.json"));
}
