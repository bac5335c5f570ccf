use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// A single board update. This is the record shape persisted by both
/// backends; on disk it is one object of the JSON array, in the database it
/// maps 1:1 to an `updates` row.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Update {
    pub id: String,
    pub name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Update {
    /// Build a fresh update with a generated id and the current time.
    /// Callers validate the input first; construction does not re-check.
    pub fn new(name: &str, message: &str) -> Self {
        Self {
            id: models::update::new_id(),
            name: name.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Form input for posting a new update.
#[derive(Clone, Debug, Deserialize)]
pub struct UpdateInput {
    pub name: String,
    pub message: String,
}

impl UpdateInput {
    /// Trim the message and reject an empty result. Authorship is checked
    /// separately against the allow-list.
    pub fn validated_message(&self) -> Result<String, ServiceError> {
        let trimmed = self.message.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::Validation("message required".into()));
        }
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_update_gets_unique_ids() {
        let a = Update::new("Kamran Arbaz", "one");
        let b = Update::new("Kamran Arbaz", "two");
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, "Kamran Arbaz");
    }

    #[test]
    fn message_is_trimmed() {
        let input = UpdateInput { name: "Drishya CM".into(), message: "  hello \n".into() };
        assert_eq!(input.validated_message().unwrap(), "hello");
    }

    #[test]
    fn whitespace_only_message_is_rejected() {
        let input = UpdateInput { name: "Drishya CM".into(), message: " \t ".into() };
        assert!(matches!(input.validated_message(), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let u = Update::new("Abigail Das", "hi");
        let json = serde_json::to_value(&u).unwrap();
        for key in ["id", "name", "message", "timestamp"] {
            assert!(json.get(key).is_some(), "missing field {key}");
        }
    }
}
