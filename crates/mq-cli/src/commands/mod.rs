//! CLI command implementations

pub(crate) mod clean;
pub(crate) mod common;
pub(crate) mod ls;
pub(crate) mod marker;
pub(crate) mod package;
pub(crate) mod run;
pub(crate) mod sessions;
pub(crate) mod show;
pub(crate) mod upload;
