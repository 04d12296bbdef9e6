use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Message returned whenever a request body does not carry a usable title.
pub const TITLE_REQUIRED: &str = "Title is required";

/// Stored todo row.
#[derive(Debug, Clone, PartialEq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Wire representation of a todo. `created_at` is persisted but not exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoResponse {
    pub id: i64,
    pub title: String,
}

impl From<&Todo> for TodoResponse {
    fn from(todo: &Todo) -> Self {
        TodoResponse {
            id: todo.id,
            title: todo.title.clone(),
        }
    }
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        TodoResponse {
            id: todo.id,
            title: todo.title,
        }
    }
}

/// Body accepted by the create and update endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct TodoRequest {
    pub title: Option<String>,
}

impl TodoRequest {
    /// Parse a raw request body. Anything that is not a JSON object with a
    /// string `title` is reported as a missing title.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        if body.is_empty() {
            return Err(ApiError::validation(TITLE_REQUIRED));
        }

        let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
            tracing::debug!("Unparseable todo body: {}", e);
            ApiError::validation(TITLE_REQUIRED)
        })?;

        if !value.is_object() {
            return Err(ApiError::validation(TITLE_REQUIRED));
        }

        serde_json::from_value(value).map_err(|e| {
            tracing::debug!("Todo body has wrong shape: {}", e);
            ApiError::validation(TITLE_REQUIRED)
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => Ok(()),
            _ => Err(TITLE_REQUIRED.to_string()),
        }
    }

    /// Validate and hand back the title to persist.
    pub fn into_title(self) -> Result<String, ApiError> {
        self.validate().map_err(ApiError::Validation)?;
        Ok(self.title.unwrap_or_default())
    }
}

/// Parse a path segment as a todo id. Only plain decimal digits qualify, so
/// signs, letters and out-of-range values are rejected.
pub fn parse_todo_id(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_of(body: &str) -> Result<String, ApiError> {
        TodoRequest::from_body(body.as_bytes())?.into_title()
    }

    #[test]
    fn test_todo_request_accepts_title() {
        assert_eq!(title_of(r#"{"title":"Test Todo"}"#).unwrap(), "Test Todo");
    }

    #[test]
    fn test_todo_request_keeps_title_verbatim() {
        assert_eq!(title_of(r#"{"title":"  padded  "}"#).unwrap(), "  padded  ");
        assert_eq!(
            title_of(r#"{"title":"emoji 🎉 and 你好世界"}"#).unwrap(),
            "emoji 🎉 and 你好世界"
        );
    }

    #[test]
    fn test_todo_request_ignores_extra_fields() {
        assert_eq!(
            title_of(r#"{"title":"Keep","completed":true}"#).unwrap(),
            "Keep"
        );
    }

    #[test]
    fn test_todo_request_rejects_missing_title() {
        let bodies = [
            "",
            "{}",
            "null",
            r#"["Array title"]"#,
            "\"title\"",
            "{not json",
            r#"{"title":null}"#,
            r#"{"title":""}"#,
            r#"{"title":42}"#,
        ];
        for body in bodies {
            match title_of(body) {
                Err(ApiError::Validation(message)) => assert_eq!(message, TITLE_REQUIRED),
                other => panic!("body {:?} should be rejected, got {:?}", body, other),
            }
        }
    }

    #[test]
    fn test_todo_response_drops_created_at() {
        let todo = Todo {
            id: 7,
            title: "Serialize me".to_string(),
            created_at: DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        let json = serde_json::to_string(&TodoResponse::from(&todo)).unwrap();
        assert_eq!(json, r#"{"id":7,"title":"Serialize me"}"#);
    }

    #[test]
    fn test_parse_todo_id() {
        assert_eq!(parse_todo_id("1"), Some(1));
        assert_eq!(parse_todo_id("99999"), Some(99999));
        assert_eq!(parse_todo_id("invalid"), None);
        assert_eq!(parse_todo_id("-1"), None);
        assert_eq!(parse_todo_id("+1"), None);
        assert_eq!(parse_todo_id(""), None);
        assert_eq!(parse_todo_id("99999999999999999999"), None);
    }
}
