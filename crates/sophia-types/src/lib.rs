pub mod models;

pub use models::{Conversation, ConversationType, Message, ParseKindError, Role, User};
