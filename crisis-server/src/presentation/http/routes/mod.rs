use axum::Router;

use crate::presentation::AppState;

pub(crate) mod comments;
pub(crate) mod disasters;
pub(crate) mod users;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/api/users", users::router(state.clone()))
        .nest("/api/comments", comments::router(state))
        .merge(disasters::router())
}
