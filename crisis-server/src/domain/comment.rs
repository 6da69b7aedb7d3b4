use chrono::{DateTime, Utc};

use super::error::DomainError;

pub(crate) const MAX_CONTENT_CHARS: usize = 2000;

#[derive(Debug, Clone)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) content: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    pub(crate) author_id: i64,
    pub(crate) author_username: String,
    /// ReliefWeb event id, stored as-is.
    pub(crate) event: i64,
}

impl Comment {
    pub(crate) fn new(
        id: i64,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        author_id: i64,
        author_username: impl Into<String>,
        event: i64,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        validate_positive_i64("author_id", author_id)?;
        let content = normalize_content(&content.into())?;

        if updated_at < created_at {
            return Err(DomainError::validation("updated_at", "must be >= created_at"));
        }

        Ok(Self {
            id,
            content,
            created_at,
            updated_at,
            author_id,
            author_username: author_username.into(),
            event,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CreateCommentRequest {
    pub(crate) content: String,
    pub(crate) event: i64,
}

impl CreateCommentRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            content: normalize_content(&self.content)?,
            event: self.event,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct UpdateCommentRequest {
    pub(crate) content: String,
    pub(crate) event: Option<i64>,
}

impl UpdateCommentRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            content: normalize_content(&self.content)?,
            event: self.event,
        })
    }
}

/// Selects which comments a list request returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommentFilter {
    Event(i64),
    Author(i64),
}

impl CommentFilter {
    /// Raw query values; blank values count as absent and event takes
    /// precedence when both are supplied.
    pub(crate) fn from_params(
        event: Option<&str>,
        user: Option<&str>,
    ) -> Result<Self, DomainError> {
        if let Some(event) = non_blank(event) {
            return parse_id("event", event).map(Self::Event);
        }
        if let Some(user) = non_blank(user) {
            return parse_id("user", user).map(Self::Author);
        }
        Err(DomainError::validation(
            "query",
            "Query parameter for event or user is required",
        ))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_id(field: &'static str, raw: &str) -> Result<i64, DomainError> {
    raw.parse()
        .map_err(|_| DomainError::validation(field, "must be an integer"))
}

fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::validation(field, "must be > 0"));
    }
    Ok(())
}

fn normalize_content(content: &str) -> Result<String, DomainError> {
    let content = content.trim();
    if content.is_empty() || content.chars().count() > MAX_CONTENT_CHARS {
        return Err(DomainError::validation("content", "must be 1..2000 chars"));
    }
    Ok(content.to_string())
}
