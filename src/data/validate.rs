//! Checks a caller runs before handing input to [`crate::grouping::assign`].

use thiserror::Error;

use crate::grouping::Employee;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please enter employees first.")]
    NoEmployees,
    #[error("You must enter exactly {expected} leaders (got {actual}).")]
    LeaderCountMismatch { expected: usize, actual: usize },
}

pub fn validate_inputs(
    employees: &[Employee],
    leaders: &[String],
    expected_leaders: usize,
) -> Result<(), InputError> {
    if employees.is_empty() {
        return Err(InputError::NoEmployees);
    }
    if leaders.len() != expected_leaders {
        return Err(InputError::LeaderCountMismatch {
            expected: expected_leaders,
            actual: leaders.len(),
        });
    }
    Ok(())
}
