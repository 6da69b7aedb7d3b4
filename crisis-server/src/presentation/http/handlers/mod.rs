pub(crate) mod comments;
pub(crate) mod disasters;
pub(crate) mod users;
