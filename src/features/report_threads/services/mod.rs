pub mod reply_policy_service;
pub mod thread_resolver_service;
pub mod thread_session_service;
pub mod thread_view_service;

pub use reply_policy_service::{can_compose, filter_reply_targets};
pub use thread_resolver_service::ThreadResolver;
pub use thread_session_service::{ComposeState, SessionPhase, ThreadSession};
pub use thread_view_service::flatten_report;
