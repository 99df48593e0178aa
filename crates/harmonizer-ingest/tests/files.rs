use harmonizer_ingest::{IngestError, read_matrix, write_matrix};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

#[test]
fn tsv_round_trip_keeps_ragged_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.tsv");
    let matrix = vec![
        strings(&["Sample", "", "Host"]),
        strings(&["sample id", "notes", "host age"]),
        strings(&["S1", "has, comma", "40"]),
        strings(&["S2"]),
    ];
    write_matrix(&path, &matrix).unwrap();
    assert_eq!(read_matrix(&path).unwrap(), matrix);
}

#[test]
fn csv_quotes_and_bom_are_handled() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("import.csv");
    std::fs::write(&path, "\u{feff}sample id,notes\nS1,\"a, b\"\n").unwrap();
    assert_eq!(
        read_matrix(&path).unwrap(),
        vec![strings(&["sample id", "notes"]), strings(&["S1", "a, b"])]
    );
}

#[test]
fn binary_spreadsheets_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.xlsx");
    std::fs::write(&path, b"PK").unwrap();
    assert!(matches!(
        read_matrix(&path),
        Err(IngestError::UnsupportedFormat { .. })
    ));
}

#[test]
fn missing_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.csv");
    let err = read_matrix(&path).unwrap_err();
    assert!(err.to_string().contains("missing.csv"));
}
