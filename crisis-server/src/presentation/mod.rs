use sqlx::PgPool;
use std::sync::Arc;

use crate::application::account_service::AccountService;
use crate::application::comment_service::CommentService;
use crate::application::disaster_service::DisasterService;
use crate::data::repositories::postgres::comment_repository::PostgresCommentRepository;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;
use crate::data::sources::reliefweb::ReliefWebSource;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod http;

pub(crate) type PgAccountService = AccountService<PostgresUserRepository, PostgresCommentRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) pool: PgPool,
    pub(crate) account_service: Arc<PgAccountService>,
    pub(crate) comment_service: Arc<CommentService<PostgresCommentRepository>>,
    pub(crate) disaster_service: Arc<DisasterService<ReliefWebSource>>,
    pub(crate) jwt: Arc<JwtService>,
}

impl AppState {
    pub(crate) fn new(
        pool: PgPool,
        account_service: Arc<PgAccountService>,
        comment_service: Arc<CommentService<PostgresCommentRepository>>,
        disaster_service: Arc<DisasterService<ReliefWebSource>>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self {
            pool,
            account_service,
            comment_service,
            disaster_service,
            jwt,
        }
    }
}
