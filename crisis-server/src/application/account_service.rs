use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use tracing::info;

use crate::data::comment_repository::CommentRepository;
use crate::data::user_repository::{NewUser, UserPatch, UserRepository};
use crate::domain::comment::CommentFilter;
use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, Profile, RegisterRequest, UpdateProfileRequest, User};
use crate::infrastructure::jwt::JwtService;

#[derive(Debug, Clone)]
pub(crate) struct AuthResult {
    pub(crate) user: User,
    pub(crate) access_token: String,
}

pub(crate) struct AccountService<U: UserRepository, C: CommentRepository> {
    users: U,
    comments: C,
    jwt: Arc<JwtService>,
}

impl<U: UserRepository, C: CommentRepository> AccountService<U, C> {
    const DUMMY_PASSWORD_HASH: &'static str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

    pub(crate) fn new(users: U, comments: C, jwt: Arc<JwtService>) -> Self {
        Self {
            users,
            comments,
            jwt,
        }
    }

    /// Creates the account without issuing a token; clients log in separately.
    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<User, DomainError> {
        let req = req.validate()?;

        let password_hash = self.hash_password(&req.password)?;

        let user = self
            .users
            .create_user(NewUser {
                username: req.username,
                email: req.email,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, "account registered");
        Ok(user)
    }

    pub(crate) async fn login(&self, req: LoginRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        let user_creds = match self.users.find_by_username(&req.username).await? {
            Some(user_creds) => user_creds,
            None => {
                // стремимся к одинаковому времени проверки если user не найден
                match self.verify_password(&req.password, Self::DUMMY_PASSWORD_HASH) {
                    Ok(()) | Err(DomainError::InvalidCredentials) => {}
                    Err(err) => return Err(err),
                }
                return Err(DomainError::InvalidCredentials);
            }
        };

        self.verify_password(&req.password, &user_creds.password_hash)?;

        let access_token = self
            .jwt
            .generate_token(user_creds.user.id, &user_creds.user.username)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(AuthResult {
            user: user_creds.user,
            access_token,
        })
    }

    pub(crate) async fn get_profile(&self, user_id: i64) -> Result<Profile, DomainError> {
        let user = self.find_user(user_id).await?;
        let comments = self
            .comments
            .list_comments(CommentFilter::Author(user.id))
            .await?;

        Ok(Profile { user, comments })
    }

    /// Partial update of the caller's own account.
    pub(crate) async fn update_profile(
        &self,
        actor_user_id: i64,
        target_user_id: i64,
        req: UpdateProfileRequest,
    ) -> Result<Profile, DomainError> {
        Self::ensure_owner(actor_user_id, target_user_id)?;
        let current = self.find_user(target_user_id).await?;
        let req = req.validate(&current)?;

        if !req.is_empty() {
            let password_hash = req
                .password
                .as_deref()
                .map(|password| self.hash_password(password))
                .transpose()?;

            let patch = UserPatch {
                username: req.username,
                email: req.email,
                password_hash,
            };
            self.users
                .update_user(target_user_id, patch)
                .await?
                .ok_or_else(|| DomainError::NotFound(format!("user id: {target_user_id}")))?;
        }

        self.get_profile(target_user_id).await
    }

    pub(crate) async fn delete_account(
        &self,
        actor_user_id: i64,
        target_user_id: i64,
    ) -> Result<(), DomainError> {
        Self::ensure_owner(actor_user_id, target_user_id)?;

        let deleted = self.users.delete_user(target_user_id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("user id: {target_user_id}")));
        }

        info!(user_id = target_user_id, "account deleted");
        Ok(())
    }

    pub(crate) fn hash_password(&self, raw_password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Self::argon2()?
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(password_hash.to_string())
    }

    pub(crate) fn verify_password(
        &self,
        raw_password: &str,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Self::argon2()?
            .verify_password(raw_password.as_bytes(), &parsed_hash)
            .map_err(|err| match err {
                PasswordHashError::Password => DomainError::InvalidCredentials,
                _ => DomainError::Unexpected(err.to_string()),
            })?;

        Ok(())
    }

    async fn find_user(&self, user_id: i64) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user id: {user_id}")))
    }

    fn ensure_owner(actor_user_id: i64, target_user_id: i64) -> Result<(), DomainError> {
        if actor_user_id != target_user_id {
            return Err(DomainError::Forbidden);
        }
        Ok(())
    }

    fn argon2() -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(19 * 1024, 2, 1, None)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}
