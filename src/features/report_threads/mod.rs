//! Report reply-thread feature.
//!
//! Loads a report's reply tree, flattens it into a chronological
//! conversation, decides who may reply to what, and posts replies. The
//! backend splits the same logical thread across an admin-scoped and a
//! general-access resource family; the resolver tries both in role-dependent
//! order so a wrong or stale role costs one extra attempt instead of a hard
//! failure.
//!
//! ## Endpoints consumed
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/user/current` | Resolve the viewer's role |
//! | GET | `/admin/report-threads/{id}` | Thread read, admin family |
//! | GET | `/report-threads/{id}` | Thread read, general family |
//! | POST | `/admin/report-replies` | Reply write, admin family |
//! | POST | `/report-replies` | Reply write, general family |

pub mod clients;
pub mod dtos;
pub mod models;
pub mod services;

pub use clients::{AdminThreadClient, GeneralThreadClient, ThreadApi, ThreadSource, UserClient};
pub use services::{
    can_compose, filter_reply_targets, flatten_report, ComposeState, SessionPhase,
    ThreadResolver, ThreadSession,
};
