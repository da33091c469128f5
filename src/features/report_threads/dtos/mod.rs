pub mod thread_dto;

pub use thread_dto::{CreateReplyRequest, CurrentUserDto, FlattenedMessage};
