//! Shared helpers used by every crate in the workspace: logging setup and
//! the small wire types returned by the HTTP layer.

pub mod types;
pub mod utils;
