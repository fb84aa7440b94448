//! Greedy least-loaded assignment of employees into leader-anchored groups.
//!
//! Each leader opens one group seeded with their own salary. The remaining
//! employees are placed largest salary first, each into the group with the
//! lowest running total that can still absorb them without passing the limit.
//! This is a heuristic, not an exact bin-packing solver.

pub mod export;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    pub salary: u64,
}

impl Employee {
    pub fn new(name: impl Into<String>, salary: u64) -> Self {
        Self {
            name: name.into(),
            salary,
        }
    }
}

/// One leader's group. `members[0]` is always the leader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub leader: String,
    pub members: Vec<Employee>,
    pub total: u64,
}

impl Group {
    fn led_by(leader: &str, salary: u64) -> Self {
        Self {
            leader: leader.to_string(),
            members: vec![Employee::new(leader, salary)],
            total: salary,
        }
    }

    fn admits(&self, salary: u64, limit: u64) -> bool {
        self.total
            .checked_add(salary)
            .is_some_and(|total| total <= limit)
    }

    fn push(&mut self, employee: Employee) {
        self.total += employee.salary;
        self.members.push(employee);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupingResult {
    /// Groups in the order the leaders were supplied.
    pub groups: Vec<Group>,
    pub unassigned: Vec<Employee>,
}

impl GroupingResult {
    pub fn group(&self, leader: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.leader == leader)
    }

    pub fn all_assigned(&self) -> bool {
        self.unassigned.is_empty()
    }

    pub fn member_count(&self) -> usize {
        self.groups.iter().map(|group| group.members.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    #[error("Leader '{0}' not found in employees list.")]
    UnknownLeader(String),
    #[error("Duplicate leader names found: '{0}'.")]
    DuplicateLeader(String),
}

/// Assign `employees` to one group per leader without any group total exceeding `limit`.
///
/// Fails before computing anything if a leader is not an employee, or a leader
/// is listed twice; the unknown-leader check runs first. Employees that fit
/// nowhere end up in [`GroupingResult::unassigned`], which is not an error.
///
/// When employee names repeat, a leader's salary comes from the last entry
/// with that name, and every entry sharing a leader's name is left out of
/// the pool.
pub fn assign(
    employees: &[Employee],
    leaders: &[String],
    limit: u64,
) -> Result<GroupingResult, AssignError> {
    let salary_by_name: HashMap<&str, u64> = employees
        .iter()
        .map(|employee| (employee.name.as_str(), employee.salary))
        .collect();

    if let Some(missing) = leaders
        .iter()
        .find(|leader| !salary_by_name.contains_key(leader.as_str()))
    {
        return Err(AssignError::UnknownLeader(missing.clone()));
    }

    let mut leader_names: HashSet<&str> = HashSet::with_capacity(leaders.len());
    for leader in leaders {
        if !leader_names.insert(leader.as_str()) {
            return Err(AssignError::DuplicateLeader(leader.clone()));
        }
    }

    let mut groups: Vec<Group> = leaders
        .iter()
        .map(|leader| Group::led_by(leader, salary_by_name[leader.as_str()]))
        .collect();

    let mut pool: Vec<&Employee> = employees
        .iter()
        .filter(|employee| !leader_names.contains(employee.name.as_str()))
        .collect();
    pool.sort_by(|left, right| right.salary.cmp(&left.salary));

    debug!(
        groups = groups.len(),
        pool = pool.len(),
        limit,
        "assigning employees to groups"
    );

    let mut ranking: Vec<usize> = (0..groups.len()).collect();
    let mut unassigned = Vec::new();

    for employee in pool {
        // Equal totals keep leader order.
        ranking.sort_by_key(|&index| (groups[index].total, index));

        match ranking
            .iter()
            .copied()
            .find(|&index| groups[index].admits(employee.salary, limit))
        {
            Some(index) => {
                trace!(
                    employee = %employee.name,
                    salary = employee.salary,
                    leader = %groups[index].leader,
                    "assigned"
                );
                groups[index].push(employee.clone());
            }
            None => {
                trace!(employee = %employee.name, salary = employee.salary, "no group fits");
                unassigned.push(employee.clone());
            }
        }
    }

    debug!(unassigned = unassigned.len(), "assignment finished");

    Ok(GroupingResult { groups, unassigned })
}
