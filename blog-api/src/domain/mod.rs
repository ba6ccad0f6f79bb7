pub(crate) mod error;
pub(crate) mod fields;
pub(crate) mod password_policy;
pub(crate) mod post;
pub(crate) mod read_time;
pub(crate) mod tag;
pub(crate) mod user;
