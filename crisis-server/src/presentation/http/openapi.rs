use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::http::handlers::comments::{CommentDto, CreateCommentDto, UpdateCommentDto};
use crate::presentation::http::handlers::disasters::{
    CountryCountDto, DisasterStatsDto, MonthCountDto, RecentDisasterDto, TypeCountDto,
};
use crate::presentation::http::handlers::users::{
    AuthResponseDto, DetailDto, LoginDto, ProfileDto, RegisterDto, UpdateProfileDto, UserDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::handlers::users::register,
        crate::presentation::http::handlers::users::login,
        crate::presentation::http::handlers::users::get_own_profile,
        crate::presentation::http::handlers::users::update_own_profile,
        crate::presentation::http::handlers::users::delete_own_profile,
        crate::presentation::http::handlers::users::get_profile,
        crate::presentation::http::handlers::users::update_profile,
        crate::presentation::http::handlers::users::delete_profile,
        crate::presentation::http::handlers::comments::list_comments,
        crate::presentation::http::handlers::comments::get_comment,
        crate::presentation::http::handlers::comments::create_comment,
        crate::presentation::http::handlers::comments::update_comment,
        crate::presentation::http::handlers::comments::delete_comment,
        crate::presentation::http::handlers::disasters::list_disasters,
        crate::presentation::http::handlers::disasters::get_stats
    ),
    components(
        schemas(
            RegisterDto,
            LoginDto,
            UpdateProfileDto,
            DetailDto,
            AuthResponseDto,
            UserDto,
            ProfileDto,
            CreateCommentDto,
            UpdateCommentDto,
            CommentDto,
            DisasterStatsDto,
            RecentDisasterDto,
            CountryCountDto,
            MonthCountDto,
            TypeCountDto
        )
    ),
    tags(
        (name = "users", description = "Accounts and profiles"),
        (name = "comments", description = "Comments on disaster events"),
        (name = "disasters", description = "ReliefWeb disaster data")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
