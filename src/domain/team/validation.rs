//! Team validation

use thiserror::Error;

/// Errors that can occur during team validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TeamValidationError {
    #[error("Team name cannot be empty")]
    EmptyName,

    #[error("Team name cannot exceed {0} characters")]
    NameTooLong(usize),

    #[error("Unknown team role '{0}'")]
    UnknownRole(String),
}

/// Leaves room for the "'s space" suffix on a maximal user name
const MAX_TEAM_NAME_LENGTH: usize = 120;

/// Validate a team name
pub fn validate_team_name(name: &str) -> Result<(), TeamValidationError> {
    if name.trim().is_empty() {
        return Err(TeamValidationError::EmptyName);
    }

    if name.chars().count() > MAX_TEAM_NAME_LENGTH {
        return Err(TeamValidationError::NameTooLong(MAX_TEAM_NAME_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_team_names() {
        assert!(validate_team_name("Ada's space").is_ok());
        assert!(validate_team_name(&"a".repeat(120)).is_ok());
    }

    #[test]
    fn test_invalid_team_names() {
        assert_eq!(validate_team_name(""), Err(TeamValidationError::EmptyName));
        assert_eq!(
            validate_team_name(&"a".repeat(121)),
            Err(TeamValidationError::NameTooLong(120))
        );
    }
}
