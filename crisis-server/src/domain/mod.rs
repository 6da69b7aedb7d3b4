pub(crate) mod comment;
pub(crate) mod disaster;
pub(crate) mod error;
pub(crate) mod stats;
pub(crate) mod user;
