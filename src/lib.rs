//! Client-side core for the student society management app.
//!
//! Most of the application is CRUD screens that are thin wrappers over the
//! backend REST API. This crate carries the one piece with real logic: the
//! report reply-thread flow — loading a report's reply tree, flattening it
//! into a chronological conversation, deciding who may reply to what, and
//! recovering from the backend's split admin/general endpoint families.

pub mod core;
pub mod features;
pub mod shared;

pub use crate::core::config::{ApiConfig, Config};
pub use crate::core::error::{AppError, Result, ThreadError};
pub use crate::features::report_threads::dtos::{CreateReplyRequest, FlattenedMessage};
pub use crate::features::report_threads::models::{Reply, Report, Role};
pub use crate::features::report_threads::{
    AdminThreadClient, ComposeState, GeneralThreadClient, SessionPhase, ThreadApi,
    ThreadResolver, ThreadSession, ThreadSource, UserClient,
};
