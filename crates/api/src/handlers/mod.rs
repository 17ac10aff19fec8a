//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the repositories in `talentops_db` and the domain
//! functions in `talentops_core`, and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod location;
pub mod project;
pub mod readiness;
pub mod role_template;
pub mod talent;
pub mod talent_group;
pub mod team;
pub mod timecard;
