use async_trait::async_trait;

use crate::domain::comment::{Comment, CommentFilter};
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct NewComment {
    pub(crate) content: String,
    pub(crate) event: i64,
    pub(crate) author_id: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct CommentPatch {
    pub(crate) content: String,
    pub(crate) event: Option<i64>,
}

#[async_trait]
pub(crate) trait CommentRepository: Send + Sync {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError>;
    async fn get_comment(&self, id: i64) -> Result<Option<Comment>, DomainError>;
    async fn update_comment_owned(
        &self,
        comment_id: i64,
        owner_id: i64,
        patch: CommentPatch,
    ) -> Result<Option<Comment>, DomainError>;
    async fn delete_comment(&self, id: i64) -> Result<bool, DomainError>;
    /// Newest first.
    async fn list_comments(&self, filter: CommentFilter) -> Result<Vec<Comment>, DomainError>;
}
