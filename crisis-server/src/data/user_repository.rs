use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::user::User;

#[derive(Debug, Clone)]
pub(crate) struct UserCredentials {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct UserPatch {
    pub(crate) username: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) password_hash: Option<String>,
}

#[async_trait]
pub(crate) trait UserRepository: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<UserCredentials>, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;
    async fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>, DomainError>;
    async fn delete_user(&self, id: i64) -> Result<bool, DomainError>;
}
