pub mod broadcast;
pub mod messages;

pub use broadcast::emit_to_user;
pub use messages::*;
