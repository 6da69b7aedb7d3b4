use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::data::comment_repository::{CommentPatch, CommentRepository, NewComment};
use crate::domain::comment::{Comment, CommentFilter};
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_id: i64,
    author_username: String,
    event: i64,
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (content, event, author_id)
                VALUES ($1, $2, $3)
                RETURNING id, content, created_at, updated_at, author_id, event
            )
            SELECT
                c.id,
                c.content,
                c.created_at,
                c.updated_at,
                c.author_id,
                u.username AS author_username,
                c.event
            FROM inserted c
            JOIN users u ON u.id = c.author_id
            "#,
        )
        .bind(input.content)
        .bind(input.event)
        .bind(input.author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        map_row_to_comment(row)
    }

    async fn get_comment(&self, id: i64) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT
                c.id,
                c.content,
                c.created_at,
                c.updated_at,
                c.author_id,
                u.username AS author_username,
                c.event
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        row.map(map_row_to_comment).transpose()
    }

    async fn update_comment_owned(
        &self,
        comment_id: i64,
        owner_id: i64,
        patch: CommentPatch,
    ) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            WITH updated AS (
                UPDATE comments
                SET content = $3,
                    event = COALESCE($4, event),
                    updated_at = NOW()
                WHERE id = $1 AND author_id = $2
                RETURNING id, content, created_at, updated_at, author_id, event
            )
            SELECT
                c.id,
                c.content,
                c.created_at,
                c.updated_at,
                c.author_id,
                u.username AS author_username,
                c.event
            FROM updated c
            JOIN users u ON u.id = c.author_id
            "#,
        )
        .bind(comment_id)
        .bind(owner_id)
        .bind(patch.content)
        .bind(patch.event)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        row.map(map_row_to_comment).transpose()
    }

    async fn delete_comment(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_comments(&self, filter: CommentFilter) -> Result<Vec<Comment>, DomainError> {
        let (column_filter, value) = match filter {
            CommentFilter::Event(event) => ("c.event = $1", event),
            CommentFilter::Author(author_id) => ("c.author_id = $1", author_id),
        };

        let sql = format!(
            r#"
            SELECT
                c.id,
                c.content,
                c.created_at,
                c.updated_at,
                c.author_id,
                u.username AS author_username,
                c.event
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE {column_filter}
            ORDER BY c.created_at DESC, c.id DESC
            "#
        );

        let rows = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await
            .map_err(map_comment_db_error)?;

        rows.into_iter().map(map_row_to_comment).collect()
    }
}

fn map_row_to_comment(row: CommentRow) -> Result<Comment, DomainError> {
    Comment::new(
        row.id,
        row.content,
        row.created_at,
        row.updated_at,
        row.author_id,
        row.author_username,
        row.event,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_comment_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        return DomainError::NotFound("author".to_string());
    }
    DomainError::Unexpected(err.to_string())
}
