pub mod thread_api;
pub mod user_api;

pub use thread_api::{AdminThreadClient, GeneralThreadClient, ThreadApi, ThreadSource};
pub use user_api::UserClient;
