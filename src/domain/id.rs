//! UUID-backed identifier newtypes

/// Declares a `Copy` identifier wrapping a [`uuid::Uuid`]
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generate a new random identifier
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID
            pub fn from_uuid(id: uuid::Uuid) -> Self {
                Self(id)
            }

            /// Get the inner UUID
            pub fn as_uuid(&self) -> uuid::Uuid {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::domain::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s.trim()).map(Self).map_err(|e| {
                    crate::domain::DomainError::validation(format!(
                        "Invalid {} '{}': {}",
                        stringify!($name),
                        s,
                        e
                    ))
                })
            }
        }
    };
}

pub(crate) use uuid_id;

#[cfg(test)]
mod tests {
    use crate::domain::user::UserId;

    #[test]
    fn test_parse_and_display() {
        let id = UserId::generate();
        let parsed: UserId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_invalid() {
        let err = "not-a-uuid".parse::<UserId>().unwrap_err();
        assert!(err.to_string().contains("Invalid UserId"));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = UserId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }
}
