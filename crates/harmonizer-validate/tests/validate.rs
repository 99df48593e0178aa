use std::path::PathBuf;

use harmonizer_model::{CellWrite, Grid, GridMut, GridView};
use harmonizer_schema::{CompiledSchema, compile, load_schema_json};
use harmonizer_validate::{GridValidator, RowFilter, ValidationReport, visible_rows};

const WIDTH: usize = 15;
const PROVENANCE: usize = 14;

fn demo_schema() -> CompiledSchema {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../templates/demo/schema.json");
    compile(&load_schema_json(&path).expect("load demo schema")).expect("compile demo schema")
}

fn row(values: &[&str]) -> Vec<String> {
    let mut row: Vec<String> = values.iter().map(|v| (*v).to_string()).collect();
    row.resize(WIDTH, String::new());
    row
}

fn demo_grid() -> Grid {
    Grid::from_rows(
        WIDTH,
        vec![
            row(&[
                "S1",
                "BCCDC Public Health Laboratory",
                "2020-05-17",
                "day",
                "Canada",
                "Blood;Saliva",
                "34",
                "year",
                "30 - 39",
                "Female",
                "canada",
                "3",
            ]),
            row(&[]),
            row(&["S2", "Not Applicable", "2020-13-01", "", "Canada"]),
        ],
    )
}

#[test]
fn one_invalid_cell_in_demo_grid() {
    let schema = demo_schema();
    assert_eq!(schema.width(), WIDTH);
    let validator = GridValidator::new(&schema).with_version("9.9.9");
    let pass = validator.validate(&demo_grid());

    let cells: Vec<_> = pass.invalid_cells.iter().collect();
    assert_eq!(cells, vec![(2, 2, "Date must be a valid YYYY-MM-DD date")]);
    assert_eq!(
        pass.provenance_writes,
        vec![
            CellWrite::new(0, PROVENANCE, "Harmonizer provenance: v9.9.9"),
            CellWrite::new(2, PROVENANCE, "Harmonizer provenance: v9.9.9"),
        ]
    );
}

#[test]
fn required_empty_cells_are_reported() {
    let schema = demo_schema();
    let grid = Grid::from_rows(WIDTH, vec![row(&["", "", "", "", "", "", "12"])]);
    let pass = GridValidator::new(&schema).validate(&grid);
    let invalid_columns: Vec<usize> = pass.invalid_cells.iter().map(|(_, col, _)| col).collect();
    assert_eq!(invalid_columns, vec![0, 1, 2, 4]);
    assert_eq!(pass.invalid_cells.get(0, 0), Some("Required cells cannot be empty"));
}

#[test]
fn in_place_validation_stamps_provenance() {
    let schema = demo_schema();
    let mut grid = demo_grid();
    grid.set_value_at(
        0,
        PROVENANCE,
        "Harmonizer provenance: v0.1.0;checked by lab".to_string(),
    );
    let validator = GridValidator::new(&schema).with_version("1.2.3");

    let invalid = validator.validate_in_place(&mut grid);
    assert_eq!(invalid.cell_count(), 1);
    assert_eq!(
        grid.value_at(0, PROVENANCE),
        "Harmonizer provenance: v1.2.3;checked by lab"
    );
    assert_eq!(grid.value_at(1, PROVENANCE), "");

    let again = validator.validate(&grid);
    assert!(again.provenance_writes.is_empty());
}

#[test]
fn report_counts_and_row_filters() {
    let schema = demo_schema();
    let grid = demo_grid();
    let validator = GridValidator::new(&schema);
    let pass = validator.validate(&grid);

    assert_eq!(visible_rows(&grid, &pass.invalid_cells, RowFilter::Valid), vec![0]);
    assert_eq!(visible_rows(&grid, &pass.invalid_cells, RowFilter::Invalid), vec![2]);

    let report = ValidationReport::new(&schema, &pass.invalid_cells, grid.row_count(), validator.version());
    assert!(!report.is_valid());
    insta::assert_debug_snapshot!(report.fields, @r#"
    [
        FieldSummary {
            column: 2,
            field: "sample collection date",
            invalid: 1,
        },
    ]
    "#);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["cells"]["2"]["2"], "Date must be a valid YYYY-MM-DD date");
    assert_eq!(json["invalid_rows"], 1);
}
