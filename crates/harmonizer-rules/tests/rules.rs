use harmonizer_model::{
    CaseMode, CellWrite, DataType, Field, Grid, GridMut, Schema, Section, Vocabulary,
};
use harmonizer_rules::{DateGranularity, RuleEngine, select_bin, truncate_date};
use harmonizer_schema::{CompiledSchema, compile};
use proptest::prelude::*;

// columns
const AGE: usize = 0;
const AGE_UNIT: usize = 1;
const AGE_BIN: usize = 2;
const DATE: usize = 3;
const DATE_UNIT: usize = 4;
const SCORE: usize = 5;
const SCORE_BIN: usize = 6;
const GENDER: usize = 7;

fn schema() -> CompiledSchema {
    let mut section = Section::new("Host");
    section.fields = vec![
        Field::new("age", DataType::Decimal),
        Field::new("age unit", DataType::Select)
            .with_vocabulary(Vocabulary::from_labels(["year", "month"])),
        Field::new("age bin", DataType::Select)
            .with_vocabulary(Vocabulary::from_labels(["0 - 9", "10 - 19", "20 - 29"])),
        Field::new("collection date", DataType::Date),
        Field::new("collection date unit", DataType::Select)
            .with_vocabulary(Vocabulary::from_labels(["year", "month", "day"])),
        Field::new("score", DataType::Decimal),
        Field::new("score bin", DataType::Select)
            .with_vocabulary(Vocabulary::from_labels(["0 - 4", "5+"])),
        Field::new("gender", DataType::Select)
            .with_capitalize(CaseMode::Title)
            .with_vocabulary(Vocabulary::from_labels(["female", "male"])),
    ];
    compile(&Schema::new(vec![section])).expect("compile")
}

fn row(values: &[&str]) -> Vec<String> {
    let mut row: Vec<String> = values.iter().map(|v| (*v).to_string()).collect();
    row.resize(8, String::new());
    row
}

fn grid(rows: Vec<Vec<String>>) -> Grid {
    Grid::from_rows(8, rows)
}

#[test]
fn base_edit_recomputes_bin_with_live_unit() {
    let schema = schema();
    let engine = RuleEngine::new(&schema);
    let grid = grid(vec![row(&["", "month", ""])]);
    let outcome = engine.on_edit(&grid, CellWrite::new(0, AGE, "24"));
    assert_eq!(outcome.edit.value, "24");
    assert_eq!(outcome.writes, vec![CellWrite::new(0, AGE_BIN, "0 - 9")]);
}

#[test]
fn unit_edit_recomputes_bin_from_live_base() {
    let schema = schema();
    let engine = RuleEngine::new(&schema);
    let grid = grid(vec![row(&["24", "month", "0 - 9"])]);
    let outcome = engine.on_edit(&grid, CellWrite::new(0, AGE_UNIT, "year"));
    assert_eq!(outcome.writes, vec![CellWrite::new(0, AGE_BIN, "20 - 29")]);
}

#[test]
fn write_is_emitted_even_when_bin_is_unchanged() {
    let schema = schema();
    let engine = RuleEngine::new(&schema);
    let grid = grid(vec![row(&["12", "year", "10 - 19"])]);
    let outcome = engine.on_edit(&grid, CellWrite::new(0, AGE, "15"));
    assert_eq!(outcome.writes, vec![CellWrite::new(0, AGE_BIN, "10 - 19")]);
}

#[test]
fn empty_base_triggers_nothing() {
    let schema = schema();
    let engine = RuleEngine::new(&schema);
    let grid = grid(vec![row(&["", "", "10 - 19"])]);
    assert!(engine.on_edit(&grid, CellWrite::new(0, AGE, "")).writes.is_empty());
    assert!(engine.on_edit(&grid, CellWrite::new(0, AGE_UNIT, "month")).writes.is_empty());
}

#[test]
fn two_field_bin_ignores_units() {
    let schema = schema();
    let engine = RuleEngine::new(&schema);
    let grid = grid(vec![row(&[])]);
    let outcome = engine.on_edit(&grid, CellWrite::new(0, SCORE, "7"));
    assert_eq!(outcome.writes, vec![CellWrite::new(0, SCORE_BIN, "5+")]);
    let negative = engine.on_edit(&grid, CellWrite::new(0, SCORE, "-3"));
    assert_eq!(negative.writes, vec![CellWrite::new(0, SCORE_BIN, "")]);
}

#[test]
fn date_edit_is_truncated_by_unit() {
    let schema = schema();
    let engine = RuleEngine::new(&schema);
    let grid = grid(vec![row(&["", "", "", "", "month"])]);
    let outcome = engine.on_edit(&grid, CellWrite::new(0, DATE, "2020-05-17"));
    assert_eq!(outcome.edit.value, "2020-05-01");
    assert!(outcome.writes.is_empty());

    let day = grid_with_unit("day");
    let outcome = engine.on_edit(&day, CellWrite::new(0, DATE, "2020-05-17"));
    assert_eq!(outcome.edit.value, "2020-05-17");
}

fn grid_with_unit(unit: &str) -> Grid {
    grid(vec![row(&["", "", "", "", unit])])
}

#[test]
fn unit_edit_truncates_existing_date() {
    let schema = schema();
    let engine = RuleEngine::new(&schema);
    let grid = grid(vec![row(&["", "", "", "2020-05-17", "day"])]);
    let outcome = engine.on_edit(&grid, CellWrite::new(0, DATE_UNIT, "year"));
    assert_eq!(outcome.edit.value, "year");
    assert_eq!(outcome.writes, vec![CellWrite::new(0, DATE, "2020-01-01")]);

    let blank = grid_with_unit("day");
    assert!(
        engine
            .on_edit(&blank, CellWrite::new(0, DATE_UNIT, "month"))
            .writes
            .is_empty()
    );
}

#[test]
fn edited_value_is_capitalized() {
    let schema = schema();
    let engine = RuleEngine::new(&schema);
    let grid = grid(vec![row(&[])]);
    let outcome = engine.on_edit(&grid, CellWrite::new(0, GENDER, "female"));
    assert_eq!(outcome.edit.value, "Female");
}

#[test]
fn pasted_row_gets_companions_from_final_values() {
    let schema = schema();
    let engine = RuleEngine::new(&schema);
    let mut grid = grid(vec![row(&[])]);
    let writes = engine.on_edits(
        &grid,
        vec![
            CellWrite::new(0, AGE, "24"),
            CellWrite::new(0, AGE_UNIT, "month"),
            CellWrite::new(0, AGE_BIN, "20 - 29"),
            CellWrite::new(0, DATE, "2020-05-17"),
            CellWrite::new(0, DATE_UNIT, "year"),
        ],
    );
    assert_eq!(
        writes[5..].to_vec(),
        vec![
            CellWrite::new(0, AGE_BIN, "0 - 9"),
            CellWrite::new(0, DATE, "2020-01-01"),
        ]
    );

    grid.apply_writes(writes);
    assert_eq!(
        grid.row(0).unwrap(),
        row(&["24", "month", "0 - 9", "2020-01-01", "year"]).as_slice()
    );
}

#[test]
fn later_date_edit_in_batch_is_not_reverted() {
    let schema = schema();
    let engine = RuleEngine::new(&schema);
    let mut grid = grid(vec![row(&[])]);
    let writes = engine.on_edits(
        &grid,
        vec![
            CellWrite::new(0, DATE, "2020-05-17"),
            CellWrite::new(0, DATE_UNIT, "year"),
            CellWrite::new(0, DATE, "2021-03-09"),
        ],
    );
    grid.apply_writes(writes);
    assert_eq!(grid.row(0).unwrap()[DATE], "2021-01-01");
}

#[test]
fn batch_without_base_keeps_user_bin() {
    let schema = schema();
    let engine = RuleEngine::new(&schema);
    let grid = grid(vec![row(&["3", "", "", "", "", "3", ""])]);
    let writes = engine.on_edits(
        &grid,
        vec![
            CellWrite::new(0, AGE_BIN, "20 - 29"),
            CellWrite::new(0, SCORE_BIN, "5+"),
        ],
    );
    assert_eq!(
        writes,
        vec![
            CellWrite::new(0, AGE_BIN, "20 - 29"),
            CellWrite::new(0, SCORE_BIN, "5+"),
        ]
    );
}

#[test]
fn batch_sees_earlier_edits() {
    let schema = schema();
    let engine = RuleEngine::new(&schema);
    let grid = grid(vec![row(&[])]);
    let writes = engine.on_edits(
        &grid,
        vec![
            CellWrite::new(0, AGE_UNIT, "month"),
            CellWrite::new(0, AGE, "240"),
            CellWrite::new(0, SCORE, "3"),
        ],
    );
    assert_eq!(
        writes,
        vec![
            CellWrite::new(0, AGE_UNIT, "month"),
            CellWrite::new(0, AGE, "240"),
            CellWrite::new(0, SCORE, "3"),
            CellWrite::new(0, AGE_BIN, "20 - 29"),
            CellWrite::new(0, SCORE_BIN, "0 - 4"),
        ]
    );
}

#[test]
fn derive_matrix_fills_companions_left_to_right() {
    let schema = schema();
    let engine = RuleEngine::new(&schema);
    let derived = engine.derive_matrix(vec![
        row(&["24", "month", "stale", "2021-03-09", "year", "2", "", "male"]),
        row(&["35", "", "", "2021", "month", "", "", ""]),
        vec!["5".to_string()],
    ]);
    assert_eq!(
        derived[0],
        row(&["24", "month", "0 - 9", "2021-01-01", "year", "2", "0 - 4", "Male"])
    );
    assert_eq!(derived[1], row(&["35", "", "20 - 29", "2021-__-01", "month"]));
    assert_eq!(derived[2], row(&["5", "", "0 - 9"]));
}

proptest! {
    #[test]
    fn bins_are_monotonic(a in 0.0f64..200.0, b in 0.0f64..200.0) {
        let labels: Vec<String> = ["0 - 9", "10 - 19", "20 - 29", "30+"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let index = |value: f64| {
            let selected = select_bin(&value.to_string(), None, &labels);
            labels.iter().position(|label| *label == selected)
        };
        prop_assert!(index(low) <= index(high));
    }

    #[test]
    fn truncation_is_idempotent(
        year in 1900u32..2100,
        month in 1u32..13,
        day in 1u32..29,
        granularity in prop_oneof![
            Just(DateGranularity::Year),
            Just(DateGranularity::Month),
            Just(DateGranularity::Day),
        ],
    ) {
        let date = format!("{year:04}-{month:02}-{day:02}");
        let once = truncate_date(&date, granularity);
        prop_assert_eq!(truncate_date(&once, granularity), once);
    }
}
