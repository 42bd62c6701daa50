pub mod model;
pub mod service;

pub use model::{User, UserPhoto};
pub use service::*;
