//! Tests for harmonizer-model types.

use harmonizer_model::{
    CaseMode, DataType, ExportTransform, Schema, ValueRequirement, Vocabulary, normalize_case,
};
use proptest::prelude::*;

const SCHEMA_JSON: &str = r#"[
  {
    "name": "Host information",
    "children": [
      {
        "fieldID": "HC1",
        "name": "host age",
        "dataType": "xs:decimal",
        "valueRequired": "recommended",
        "minValue": "0",
        "maxValue": 130,
        "isBasedOn": "",
        "statusEnumeration": null
      },
      {
        "name": "host gender",
        "dataType": "select",
        "capitalize": "Title",
        "statusEnumeration": ["Not Applicable", "Missing"],
        "itemList": {
          "Female": {},
          "Male": {},
          "Other": {"itemList": {"Non-binary": {}}}
        }
      }
    ]
  },
  {"name": "Sample collection", "children": [{"name": "sample id", "valueRequired": "required"}]}
]"#;

#[test]
fn parses_template_schema_json() {
    let schema: Schema = serde_json::from_str(SCHEMA_JSON).expect("parse schema");
    assert_eq!(schema.sections.len(), 2);
    assert_eq!(schema.field_count(), 3);

    let age = &schema.sections[0].fields[0];
    assert_eq!(age.data_type, DataType::Decimal);
    assert_eq!(age.value_required, ValueRequirement::Recommended);
    assert_eq!(age.min_value, Some(0.0));
    assert_eq!(age.max_value, Some(130.0));
    assert_eq!(age.is_based_on, None);
    assert!(age.status_enumeration.is_empty());

    let gender = &schema.sections[0].fields[1];
    assert_eq!(gender.capitalize, CaseMode::Title);
    let vocabulary = gender.vocabulary.as_ref().expect("vocabulary");
    let labels: Vec<&str> = vocabulary.terms().map(|(label, _)| label).collect();
    assert_eq!(labels, vec!["Female", "Male", "Other"]);

    let sample = schema.fields().last().expect("last field");
    assert_eq!(sample.data_type, DataType::Text);
    assert!(sample.is_required());
}

#[test]
fn rejects_non_numeric_bound() {
    let json = r#"[{"name": "s", "children": [{"name": "f", "minValue": "low"}]}]"#;
    let err = serde_json::from_str::<Schema>(json).unwrap_err();
    assert!(err.to_string().contains("invalid bound"));
}

#[test]
fn schema_serializes_back_to_template_shape() {
    let schema: Schema = serde_json::from_str(SCHEMA_JSON).expect("parse schema");
    let value = serde_json::to_value(&schema).expect("serialize");
    let first = &value[0]["children"][1];
    assert_eq!(first["dataType"], "select");
    assert!(first["itemList"]["Other"]["itemList"]["Non-binary"].is_object());
}

#[test]
fn export_rewrites_load_on_fields_and_terms() {
    let json = r#"[{"name": "s", "children": [{
        "name": "symptoms",
        "dataType": "multiple",
        "exportField": {"LIMS": [{"field": "SYMPTOMS"}]},
        "itemList": {"Cough": {}, "Neuro": {"itemList": {
            "Confusion": {"exportField": {"LIMS": [{"field": "HC_SYMPTOMS", "value": "CONFUSION"}]}}
        }}}
    }]}]"#;
    let schema: Schema = serde_json::from_str(json).expect("parse schema");
    let field = &schema.sections[0].fields[0];
    assert_eq!(
        field.export_field["LIMS"],
        vec![ExportTransform::to_field("SYMPTOMS")]
    );
    let vocabulary = field.vocabulary.as_ref().expect("vocabulary");
    let confusion = vocabulary.find_ignore_case("confusion").expect("nested term");
    assert_eq!(
        confusion.export_field["LIMS"],
        vec![ExportTransform::to_field("HC_SYMPTOMS").with_value("CONFUSION")]
    );
    assert!(vocabulary.find_ignore_case("cough").expect("term").export_field.is_empty());

    let value = serde_json::to_value(&schema).expect("serialize");
    let cough = &value[0]["children"][0]["itemList"]["Cough"];
    assert!(cough.get("exportField").is_none());
}

#[test]
fn vocabulary_find_is_depth_first() {
    let mut vocabulary = Vocabulary::new()
        .with_term("a")
        .with_child("b", Vocabulary::from_labels(["c"]));
    vocabulary
        .find_mut("c")
        .expect("nested term")
        .children_mut()
        .insert("d");
    let nested = vocabulary
        .terms()
        .nth(1)
        .and_then(|(_, term)| term.children.as_ref())
        .and_then(|children| children.terms().next())
        .and_then(|(_, term)| term.children.as_ref())
        .expect("grandchild vocabulary");
    assert_eq!(nested.len(), 1);
}

proptest! {
    #[test]
    fn case_modes_are_idempotent(value in "[a-zA-Z0-9 _;,-]{0,24}") {
        for mode in [CaseMode::Upper, CaseMode::Lower, CaseMode::Title] {
            let once = normalize_case(&value, mode);
            prop_assert_eq!(normalize_case(&once, mode), once.clone());
        }
    }

    #[test]
    fn case_modes_keep_length_for_ascii(value in "[a-zA-Z0-9 _-]{0,24}") {
        for mode in [CaseMode::Upper, CaseMode::Lower, CaseMode::Title] {
            prop_assert_eq!(normalize_case(&value, mode).len(), value.len());
        }
    }
}
