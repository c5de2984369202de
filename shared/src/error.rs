use std::fmt;

use thiserror::Error;

/// A server payload that does not have the shape of a Post or Comment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("expected a JSON object for {entity}")]
    NotAnObject { entity: &'static str },

    #[error("expected a JSON array of {entity}")]
    NotAnArray { entity: &'static str },

    #[error("missing field `{field}`")]
    MissingField { field: &'static str },

    #[error("field `{field}` must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field `{field}` is not a valid date: {value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("item {index}: {source}")]
    InItem {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Name of the offending field, looking through list wrappers.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field }
            | Self::InvalidType { field, .. }
            | Self::InvalidDate { field, .. } => Some(*field),
            Self::InItem { source, .. } => source.field(),
            Self::NotAnObject { .. } | Self::NotAnArray { .. } => None,
        }
    }
}

/// Every failure a repository call can surface.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error: {status}")]
    Status { status: u16, body: String },

    #[error("{resource} not found with ID {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("invalid response: {0}")]
    Validation(#[from] ValidationError),

    #[error("could not decode response body: {0}")]
    Decode(String),

    #[error("could not encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Short text suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Could not reach the server".to_string(),
            Self::Status { status, body } if body.trim().is_empty() => {
                format!("Server responded with status {status}")
            }
            Self::Status { body, .. } => format!("Error caused by: {}", body.trim()),
            Self::NotFound { resource, .. } => format!("{resource} not found"),
            Self::Validation(_) | Self::Decode(_) => {
                "The server sent an unexpected response".to_string()
            }
            Self::Encode(_) => "Could not prepare the request".to_string(),
        }
    }
}

/// Browser storage (or its stand-in) refused a read or write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage write failed for `{key}`: {reason}")]
    Write { key: String, reason: String },
}

/// One form field that failed its rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// All failing fields of a submitted form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(pub Vec<FieldError>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Message for `field`, if it failed.
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }

    pub(crate) fn push(&mut self, field: &'static str, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    pub(crate) fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for e in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

pub type Result<T, E = RepositoryError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_is_reported_through_list_wrapper() {
        let err = ValidationError::InItem {
            index: 3,
            source: Box::new(ValidationError::MissingField { field: "title" }),
        };
        assert_eq!(err.field(), Some("title"));
        assert_eq!(err.to_string(), "item 3: missing field `title`");
    }

    #[test]
    fn status_message_prefers_body() {
        let err = RepositoryError::Status {
            status: 400,
            body: "title too long".into(),
        };
        assert_eq!(err.user_message(), "Error caused by: title too long");

        let err = RepositoryError::Status {
            status: 503,
            body: "  ".into(),
        };
        assert_eq!(err.user_message(), "Server responded with status 503");
    }

    #[test]
    fn undecodable_body_is_not_a_network_failure() {
        let err = RepositoryError::Decode("expected value at line 1 column 1".into());
        assert_eq!(err.user_message(), "The server sent an unexpected response");
        assert!(!err.is_not_found());
    }

    #[test]
    fn form_errors_display_joins_fields() {
        let mut errors = FormErrors::default();
        errors.push("title", "Title is required");
        errors.push("name", "Name is required");
        assert_eq!(
            errors.to_string(),
            "title: Title is required; name: Name is required"
        );
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("avatar"), None);
    }
}
