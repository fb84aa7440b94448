//! Import employees and leaders from a workbook or a pair of CSV files.
//!
//! Workbooks carry two sheets: `Employees` (columns `Name`, `Salary`) and
//! `Leaders` (column `LeaderName`). The CSV form uses the same headers, one
//! file per table. Columns are found by header name in the first row.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{Data, Range, Reader};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::grouping::Employee;

pub const EMPLOYEES_SHEET: &str = "Employees";
pub const LEADERS_SHEET: &str = "Leaders";
pub const NAME_COLUMN: &str = "Name";
pub const SALARY_COLUMN: &str = "Salary";
pub const LEADER_NAME_COLUMN: &str = "LeaderName";

/// Employees and leaders as read from an import source, ready for validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    pub employees: Vec<Employee>,
    pub leaders: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read workbook '{path}': {source}")]
    Workbook {
        path: String,
        #[source]
        source: calamine::Error,
    },
    #[error("workbook has no '{0}' sheet")]
    MissingSheet(String),
    #[error("'{table}' has no '{column}' column")]
    MissingColumn { table: String, column: String },
    #[error("{table} row {row}: '{value}' is not a valid {column}")]
    InvalidName {
        table: String,
        row: usize,
        column: String,
        value: String,
    },
    #[error("{table} row {row}: salary '{value}' is not a non-negative number")]
    InvalidSalary {
        table: String,
        row: usize,
        value: String,
    },
    #[error("failed to open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read '{table}': {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },
}

pub fn import_workbook(path: &Path) -> Result<Roster, ImportError> {
    let workbook_error = |source| ImportError::Workbook {
        path: path.display().to_string(),
        source,
    };
    let mut workbook = calamine::open_workbook_auto(path).map_err(workbook_error)?;
    let names = workbook.sheet_names();
    for required in [EMPLOYEES_SHEET, LEADERS_SHEET] {
        if !names.iter().any(|name| name == required) {
            return Err(ImportError::MissingSheet(required.to_string()));
        }
    }

    let employees = workbook
        .worksheet_range(EMPLOYEES_SHEET)
        .map_err(workbook_error)?;
    let leaders = workbook
        .worksheet_range(LEADERS_SHEET)
        .map_err(workbook_error)?;

    let roster = roster_from_ranges(&employees, &leaders)?;
    info!(
        path = %path.display(),
        employees = roster.employees.len(),
        leaders = roster.leaders.len(),
        "workbook imported"
    );
    Ok(roster)
}

pub fn roster_from_ranges(
    employees: &Range<Data>,
    leaders: &Range<Data>,
) -> Result<Roster, ImportError> {
    Ok(Roster {
        employees: employees_from_range(employees)?,
        leaders: leaders_from_range(leaders)?,
    })
}

fn employees_from_range(range: &Range<Data>) -> Result<Vec<Employee>, ImportError> {
    let mut rows = range.rows();
    let header: Vec<String> = rows.next().unwrap_or_default().iter().map(cell_text).collect();
    let name_col = find_column(&header, EMPLOYEES_SHEET, NAME_COLUMN)?;
    let salary_col = find_column(&header, EMPLOYEES_SHEET, SALARY_COLUMN)?;
    let first_row = range.start().map_or(0, |(row, _)| row as usize) + 1;

    let mut employees = Vec::new();
    for (offset, row) in rows.enumerate() {
        let sheet_row = first_row + offset + 1;
        let name = name_cell(row.get(name_col), EMPLOYEES_SHEET, NAME_COLUMN, sheet_row)?;
        if name.is_empty() {
            debug!(row = sheet_row, "skipping employee row without a name");
            continue;
        }
        let cell = row.get(salary_col).unwrap_or(&Data::Empty);
        let salary = coerce_salary(cell).ok_or_else(|| ImportError::InvalidSalary {
            table: EMPLOYEES_SHEET.to_string(),
            row: sheet_row,
            value: cell_text(cell),
        })?;
        employees.push(Employee::new(name, salary));
    }
    Ok(employees)
}

fn leaders_from_range(range: &Range<Data>) -> Result<Vec<String>, ImportError> {
    let mut rows = range.rows();
    let header: Vec<String> = rows.next().unwrap_or_default().iter().map(cell_text).collect();
    let leader_col = find_column(&header, LEADERS_SHEET, LEADER_NAME_COLUMN)?;
    let first_row = range.start().map_or(0, |(row, _)| row as usize) + 1;

    let mut leaders = Vec::new();
    for (offset, row) in rows.enumerate() {
        let name = name_cell(
            row.get(leader_col),
            LEADERS_SHEET,
            LEADER_NAME_COLUMN,
            first_row + offset + 1,
        )?;
        if !name.is_empty() {
            leaders.push(name);
        }
    }
    Ok(leaders)
}

pub fn import_csv_pair(employees_path: &Path, leaders_path: &Path) -> Result<Roster, ImportError> {
    let open = |path: &Path| {
        File::open(path).map_err(|source| ImportError::Open {
            path: path.display().to_string(),
            source,
        })
    };
    let roster = Roster {
        employees: employees_from_csv(
            open(employees_path)?,
            &employees_path.display().to_string(),
        )?,
        leaders: leaders_from_csv(open(leaders_path)?, &leaders_path.display().to_string())?,
    };
    info!(
        employees = roster.employees.len(),
        leaders = roster.leaders.len(),
        "csv files imported"
    );
    Ok(roster)
}

pub fn employees_from_csv<R: Read>(input: R, table: &str) -> Result<Vec<Employee>, ImportError> {
    let csv_error = |source| ImportError::Csv {
        table: table.to_string(),
        source,
    };
    let mut reader = csv::Reader::from_reader(input);
    let header: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|field| field.trim().to_string())
        .collect();
    let name_col = find_column(&header, table, NAME_COLUMN)?;
    let salary_col = find_column(&header, table, SALARY_COLUMN)?;

    let mut employees = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        let name = record.get(name_col).unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }
        let raw = record.get(salary_col).unwrap_or("").trim();
        let salary = coerce_salary_text(raw).ok_or_else(|| ImportError::InvalidSalary {
            table: table.to_string(),
            row: index + 2,
            value: raw.to_string(),
        })?;
        employees.push(Employee::new(name, salary));
    }
    Ok(employees)
}

pub fn leaders_from_csv<R: Read>(input: R, table: &str) -> Result<Vec<String>, ImportError> {
    let csv_error = |source| ImportError::Csv {
        table: table.to_string(),
        source,
    };
    let mut reader = csv::Reader::from_reader(input);
    let header: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|field| field.trim().to_string())
        .collect();
    let leader_col = find_column(&header, table, LEADER_NAME_COLUMN)?;

    let mut leaders = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let name = record.get(leader_col).unwrap_or("").trim();
        if !name.is_empty() {
            leaders.push(name.to_string());
        }
    }
    Ok(leaders)
}

/// First rows of one sheet, for eyeballing an import file.
#[derive(Debug, Clone, Serialize)]
pub struct SheetPreview {
    pub name: String,
    pub height: usize,
    pub width: usize,
    pub rows: Vec<Vec<String>>,
}

pub fn inspect_workbook(path: &Path, max_rows: usize) -> Result<Vec<SheetPreview>, ImportError> {
    let workbook_error = |source| ImportError::Workbook {
        path: path.display().to_string(),
        source,
    };
    let mut workbook = calamine::open_workbook_auto(path).map_err(workbook_error)?;
    let mut previews = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name).map_err(workbook_error)?;
        let (height, width) = range.get_size();
        let rows = range
            .rows()
            .take(max_rows)
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        previews.push(SheetPreview {
            name,
            height,
            width,
            rows,
        });
    }
    Ok(previews)
}

fn find_column(header: &[String], table: &str, column: &str) -> Result<usize, ImportError> {
    header
        .iter()
        .position(|name| name == column)
        .ok_or_else(|| ImportError::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        })
}

/// Display text of a cell: strings trimmed, errors as Excel shows them
/// (`#N/A`), dates as their ISO text or serial number.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Name cells must be text or numbers; dates, durations and errors are rejected.
fn name_cell(
    cell: Option<&Data>,
    table: &str,
    column: &str,
    row: usize,
) -> Result<String, ImportError> {
    match cell {
        None => Ok(String::new()),
        Some(
            cell @ (Data::DateTime(_) | Data::DateTimeIso(_) | Data::DurationIso(_) | Data::Error(_)),
        ) => Err(ImportError::InvalidName {
            table: table.to_string(),
            row,
            column: column.to_string(),
            value: cell_text(cell),
        }),
        Some(cell) => Ok(cell_text(cell)),
    }
}

/// Whole numbers pass through, fractions are truncated toward zero.
fn coerce_salary(cell: &Data) -> Option<u64> {
    match cell {
        Data::Int(i) => u64::try_from(*i).ok(),
        Data::Float(f) => truncate_salary(*f),
        Data::String(s) => coerce_salary_text(s.trim()),
        Data::Bool(b) => Some(u64::from(*b)),
        _ => None,
    }
}

fn coerce_salary_text(raw: &str) -> Option<u64> {
    if let Ok(value) = raw.parse::<u64>() {
        return Some(value);
    }
    raw.parse::<f64>().ok().and_then(truncate_salary)
}

/// Rejects any negative input, including fractions that would truncate to zero.
fn truncate_salary(value: f64) -> Option<u64> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let truncated = value.trunc();
    (truncated <= u64::MAX as f64).then_some(truncated as u64)
}
