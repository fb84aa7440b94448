//! Workbook import over the small `.xlsx` files in tests/fixtures/.

use std::path::{Path, PathBuf};

use paygroups::data::import::{import_workbook, inspect_workbook, ImportError};
use paygroups::grouping::{assign, Employee};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn workbook_import_reads_both_sheets() {
    let roster = import_workbook(&fixture_path("roster.xlsx")).expect("fixture workbook imports");

    assert_eq!(
        roster.employees,
        vec![
            Employee::new("A", 10_000),
            Employee::new("B", 20_000),
            Employee::new("C", 15_000),
            Employee::new("D", 30_000),
        ]
    );
    assert_eq!(roster.leaders, vec!["A".to_string()]);

    let result = assign(&roster.employees, &roster.leaders, 50_000).expect("valid roster");
    assert_eq!(result.groups[0].total, 40_000);
}

#[test]
fn workbook_without_leaders_sheet_is_rejected() {
    let err = import_workbook(&fixture_path("no_leaders.xlsx")).unwrap_err();
    assert!(matches!(err, ImportError::MissingSheet(ref sheet) if sheet == "Leaders"));
    assert_eq!(err.to_string(), "workbook has no 'Leaders' sheet");
}

#[test]
fn inspect_lists_sheets_and_leading_rows() {
    let previews = inspect_workbook(&fixture_path("roster.xlsx"), 2).expect("fixture inspects");
    let names: Vec<&str> = previews.iter().map(|sheet| sheet.name.as_str()).collect();
    assert_eq!(names, vec!["Employees", "Leaders"]);

    let employees = &previews[0];
    assert_eq!((employees.height, employees.width), (5, 2));
    assert_eq!(
        employees.rows,
        vec![
            vec!["Name".to_string(), "Salary".to_string()],
            vec!["A".to_string(), "10000".to_string()],
        ]
    );
}
