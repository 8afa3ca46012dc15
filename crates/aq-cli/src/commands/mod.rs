//! CLI command implementations

pub(crate) mod ask;
pub(crate) mod common;
pub(crate) mod db_check;
pub(crate) mod joins;
pub(crate) mod schema;
pub(crate) mod serve;
pub(crate) mod translate;
pub(crate) mod validate;
