use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Problem statement cannot be empty")]
    EmptyProblem,

    #[error("Problem statement too long: {actual} chars (max: {max})")]
    ProblemTooLong { actual: usize, max: usize },

    #[error("{field} cannot be empty")]
    EmptyThoughtId { field: &'static str },

    #[error("Branch direction cannot be empty")]
    EmptyDirection,

    #[error("Search limit must be at least 1")]
    InvalidLimit,
}

/// Boundary checks applied to tool arguments before they reach the engine
#[derive(Clone)]
pub struct InputValidator {
    max_problem_length: usize,
}

impl InputValidator {
    pub fn new(max_problem_length: usize) -> Self {
        Self { max_problem_length }
    }

    pub fn validate_problem(&self, problem: &str) -> std::result::Result<(), ValidationError> {
        let trimmed = problem.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::EmptyProblem);
        }

        let length = trimmed.chars().count();
        if length > self.max_problem_length {
            return Err(ValidationError::ProblemTooLong {
                actual: length,
                max: self.max_problem_length,
            });
        }

        Ok(())
    }

    pub fn validate_thought_id(
        &self,
        field: &'static str,
        thought_id: &str,
    ) -> std::result::Result<(), ValidationError> {
        if thought_id.trim().is_empty() {
            Err(ValidationError::EmptyThoughtId { field })
        } else {
            Ok(())
        }
    }

    /// Any non-empty direction is accepted; unknown ones fall through to the default template.
    pub fn validate_direction(&self, direction: &str) -> std::result::Result<(), ValidationError> {
        if direction.trim().is_empty() {
            Err(ValidationError::EmptyDirection)
        } else {
            Ok(())
        }
    }

    /// Zero is the only rejected limit; there is no upper bound.
    pub fn validate_limit(&self, limit: usize) -> std::result::Result<(), ValidationError> {
        if limit == 0 {
            Err(ValidationError::InvalidLimit)
        } else {
            Ok(())
        }
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_PROBLEM_LENGTH)
    }
}
