//! Reset token generation

use uuid::Uuid;

/// Source of random, unique reset tokens
pub trait ResetTokenGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// UUID v4 tokens
#[derive(Debug, Clone, Default)]
pub struct UuidTokenGenerator;

impl UuidTokenGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl ResetTokenGenerator for UuidTokenGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_unique_uuids() {
        let generator = UuidTokenGenerator::new();

        let first = generator.generate();
        let second = generator.generate();

        assert_ne!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }
}
