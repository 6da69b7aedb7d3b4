use tracing::info;

use crate::data::comment_repository::{CommentPatch, CommentRepository, NewComment};
use crate::domain::comment::{Comment, CommentFilter, CreateCommentRequest, UpdateCommentRequest};
use crate::domain::error::DomainError;

pub(crate) struct CommentService<R: CommentRepository> {
    repo: R,
}

impl<R: CommentRepository> CommentService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    pub(crate) async fn list_comments(
        &self,
        filter: CommentFilter,
    ) -> Result<Vec<Comment>, DomainError> {
        self.repo.list_comments(filter).await
    }

    /// The author is always the caller, never taken from the request body.
    pub(crate) async fn create_comment(
        &self,
        author_id: i64,
        req: CreateCommentRequest,
    ) -> Result<Comment, DomainError> {
        let req = req.validate()?;

        let comment = self
            .repo
            .create_comment(NewComment {
                content: req.content,
                event: req.event,
                author_id,
            })
            .await?;

        info!(comment_id = comment.id, event = comment.event, "comment created");
        Ok(comment)
    }

    pub(crate) async fn get_comment(&self, id: i64) -> Result<Comment, DomainError> {
        self.repo
            .get_comment(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("comment id: {id}")))
    }

    pub(crate) async fn update_comment(
        &self,
        actor_user_id: i64,
        comment_id: i64,
        req: UpdateCommentRequest,
    ) -> Result<Comment, DomainError> {
        let req = req.validate()?;
        self.ensure_author(actor_user_id, comment_id).await?;

        let patch = CommentPatch {
            content: req.content,
            event: req.event,
        };
        // update_comment_owned повторно проверяет автора на уровне SQL
        self.repo
            .update_comment_owned(comment_id, actor_user_id, patch)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("comment id: {comment_id}")))
    }

    pub(crate) async fn delete_comment(
        &self,
        actor_user_id: i64,
        comment_id: i64,
    ) -> Result<(), DomainError> {
        self.ensure_author(actor_user_id, comment_id).await?;

        let deleted = self.repo.delete_comment(comment_id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("comment id: {comment_id}")));
        }
        Ok(())
    }

    async fn ensure_author(&self, actor_user_id: i64, comment_id: i64) -> Result<(), DomainError> {
        let comment = self.get_comment(comment_id).await?;
        if comment.author_id != actor_user_id {
            return Err(DomainError::Forbidden);
        }
        Ok(())
    }
}
