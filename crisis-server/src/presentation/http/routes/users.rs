use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};

use crate::presentation::AppState;
use crate::presentation::http::handlers::users::{
    delete_own_profile, delete_profile, get_own_profile, get_profile, login, register,
    update_own_profile, update_profile,
};
use crate::presentation::http::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile/{id}", get(get_profile));

    let protected = Router::new()
        .route(
            "/profile",
            get(get_own_profile)
                .put(update_own_profile)
                .delete(delete_own_profile),
        )
        .route("/profile/{id}", put(update_profile).delete(delete_profile))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    public.merge(protected)
}
