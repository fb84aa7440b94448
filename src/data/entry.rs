//! Normalisation of hand-entered employees and leaders (form page, CLI text).

use serde::Deserialize;
use thiserror::Error;

use crate::grouping::Employee;

/// An employee row as typed into a form, before names are cleaned up.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmployeeEntry {
    pub name: String,
    #[serde(default)]
    pub salary: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("line {line}: expected 'name,salary', got '{text}'")]
    Malformed { line: usize, text: String },
    #[error("line {line}: salary '{value}' is not a non-negative whole number")]
    InvalidSalary { line: usize, value: String },
}

/// Trim names and drop rows whose name is blank, keeping order.
pub fn normalize_entries(entries: Vec<EmployeeEntry>) -> Vec<Employee> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let name = entry.name.trim();
            (!name.is_empty()).then(|| Employee::new(name, entry.salary))
        })
        .collect()
}

/// One leader name per line; surrounding whitespace and empty lines are ignored.
pub fn parse_leader_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `name,salary` lines. The salary is split off at the last comma so
/// names may contain commas. Blank lines are skipped, as are lines with a
/// blank name.
pub fn parse_employee_lines(text: &str) -> Result<Vec<Employee>, EntryError> {
    let mut employees = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let Some((name, salary)) = line.rsplit_once(',') else {
            return Err(EntryError::Malformed {
                line: index + 1,
                text: line.to_string(),
            });
        };
        let salary = salary.trim();
        let salary = salary.parse::<u64>().map_err(|_| EntryError::InvalidSalary {
            line: index + 1,
            value: salary.to_string(),
        })?;
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        employees.push(Employee::new(name, salary));
    }
    Ok(employees)
}
