use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GroupingConfig;
use crate::data::entry::{
    normalize_entries, parse_employee_lines, parse_leader_lines, EmployeeEntry, EntryError,
};
use crate::data::validate::{validate_inputs, InputError};
use crate::grouping::export::to_csv_string;
use crate::grouping::{assign, AssignError, Employee, Group, GroupingResult};

/// Employees and leaders come either as structured lists or as the raw
/// textarea contents (`name,salary` lines and one leader per line). Text
/// fields are appended after the list entries.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupRequest {
    #[serde(default)]
    pub employees: Vec<EmployeeEntry>,
    #[serde(default)]
    pub employees_text: Option<String>,
    #[serde(default)]
    pub leaders: Vec<String>,
    #[serde(default)]
    pub leaders_text: Option<String>,
    pub limit: Option<u64>,
    pub leader_count: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupResponse {
    pub status: &'static str,
    pub limit: u64,
    pub leader_count: usize,
    pub all_assigned: bool,
    pub groups: Vec<Group>,
    pub unassigned: Vec<Employee>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationErrorResponse {
    fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: "Validation failed",
            errors: vec![ValidationIssue {
                field,
                messages: vec![message.into()],
            }],
        }
    }
}

#[derive(Debug, Error)]
pub enum GroupPayloadError {
    /// The request body is not a valid grouping request.
    #[error("{0}")]
    Parse(#[source] serde_json::Error),
    #[error("invalid grouping request")]
    Validation(ValidationErrorResponse),
    /// The grouping succeeded but the response could not be encoded.
    #[error("failed to serialize response: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to export csv: {0}")]
    Export(#[source] csv::Error),
}

impl From<InputError> for GroupPayloadError {
    fn from(err: InputError) -> Self {
        let field = match err {
            InputError::NoEmployees => "employees",
            InputError::LeaderCountMismatch { .. } => "leaders",
        };
        Self::Validation(ValidationErrorResponse::single(field, err.to_string()))
    }
}

impl From<EntryError> for GroupPayloadError {
    fn from(err: EntryError) -> Self {
        Self::Validation(ValidationErrorResponse::single("employees", err.to_string()))
    }
}

impl From<AssignError> for GroupPayloadError {
    fn from(err: AssignError) -> Self {
        Self::Validation(ValidationErrorResponse::single("leaders", err.to_string()))
    }
}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "paygroups-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn config_payload(config: &GroupingConfig) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "limit": config.limit,
        "leader_count": config.leader_count,
    }))
}

struct ResolvedGrouping {
    limit: u64,
    leader_count: usize,
    result: GroupingResult,
}

fn resolve_grouping(body: &str, config: &GroupingConfig) -> Result<ResolvedGrouping, GroupPayloadError> {
    let request: GroupRequest = serde_json::from_str(body).map_err(GroupPayloadError::Parse)?;

    let limit = request.limit.unwrap_or(config.limit);
    if limit == 0 {
        return Err(GroupPayloadError::Validation(ValidationErrorResponse::single(
            "limit",
            "limit must be greater than zero",
        )));
    }
    let leader_count = request.leader_count.unwrap_or(config.leader_count);

    let mut employees = normalize_entries(request.employees);
    if let Some(text) = &request.employees_text {
        employees.extend(parse_employee_lines(text)?);
    }
    let mut leaders: Vec<String> = request
        .leaders
        .iter()
        .map(|leader| leader.trim())
        .filter(|leader| !leader.is_empty())
        .map(str::to_string)
        .collect();
    if let Some(text) = &request.leaders_text {
        leaders.extend(parse_leader_lines(text));
    }

    validate_inputs(&employees, &leaders, leader_count)?;
    let result = assign(&employees, &leaders, limit)?;

    Ok(ResolvedGrouping {
        limit,
        leader_count,
        result,
    })
}

pub fn groups_payload(body: &str, config: &GroupingConfig) -> Result<String, GroupPayloadError> {
    let resolved = resolve_grouping(body, config)?;
    let response = GroupResponse {
        status: "ok",
        limit: resolved.limit,
        leader_count: resolved.leader_count,
        all_assigned: resolved.result.all_assigned(),
        groups: resolved.result.groups,
        unassigned: resolved.result.unassigned,
    };
    serde_json::to_string_pretty(&response).map_err(GroupPayloadError::Serialize)
}

pub fn groups_csv_payload(body: &str, config: &GroupingConfig) -> Result<String, GroupPayloadError> {
    let resolved = resolve_grouping(body, config)?;
    to_csv_string(&resolved.result).map_err(GroupPayloadError::Export)
}
