pub(crate) mod comment_repository;
pub(crate) mod disaster_source;
pub(crate) mod repositories;
pub(crate) mod sources;
pub(crate) mod user_repository;
