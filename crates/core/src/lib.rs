//! Domain logic for talent scheduling, timecards, and project readiness.
//!
//! This crate has no database dependency. Persistence is reached through the
//! [`reconciler::AssignmentStore`] trait or by passing pre-loaded rows into
//! pure functions.

pub mod daily_assignment;
pub mod error;
pub mod readiness;
pub mod reconciler;
pub mod roles;
pub mod talent_group;
pub mod throttle;
pub mod timecard;
pub mod types;
