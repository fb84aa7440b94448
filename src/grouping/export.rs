//! Flatten a [`GroupingResult`] into `(Leader, Employee, Salary)` rows for CSV
//! export, and render it as a plain-text report.

use std::fmt::Write as _;
use std::io;

use serde::{Deserialize, Serialize};

use crate::grouping::{Employee, GroupingResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Leader")]
    pub leader: String,
    #[serde(rename = "Employee")]
    pub employee: String,
    #[serde(rename = "Salary")]
    pub salary: u64,
}

/// One row per group member, groups in leader order, members in assignment order.
/// Unassigned employees have no leader and are not exported.
pub fn export_rows(result: &GroupingResult) -> Vec<ExportRow> {
    result
        .groups
        .iter()
        .flat_map(|group| {
            group.members.iter().map(|member| ExportRow {
                leader: group.leader.clone(),
                employee: member.name.clone(),
                salary: member.salary,
            })
        })
        .collect()
}

pub fn write_csv<W: io::Write>(result: &GroupingResult, writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let rows = export_rows(result);
    if rows.is_empty() {
        csv_writer.write_record(["Leader", "Employee", "Salary"])?;
    }
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv_string(result: &GroupingResult) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_csv(result, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

pub fn render_table(result: &GroupingResult) -> String {
    let mut out = String::new();

    for (index, group) in result.groups.iter().enumerate() {
        let _ = writeln!(
            out,
            "Group {} - Leader: {} | Total Salary: {}",
            index + 1,
            group.leader,
            group.total
        );
        write_member_rows(&mut out, &group.members);
        out.push('\n');
    }

    if result.all_assigned() {
        out.push_str("All employees successfully assigned into groups.\n");
    } else {
        out.push_str("Unassigned Employees\n");
        out.push_str("These employees could not be assigned because all groups exceed LIMIT.\n");
        write_member_rows(&mut out, &result.unassigned);
    }

    out
}

fn write_member_rows(out: &mut String, members: &[Employee]) {
    let width = members
        .iter()
        .map(|member| member.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());
    let _ = writeln!(out, "  {:<width$}  Salary", "Name");
    for member in members {
        let _ = writeln!(out, "  {:<width$}  {}", member.name, member.salary);
    }
}
