pub(crate) mod account_service;
pub(crate) mod comment_service;
pub(crate) mod disaster_service;
