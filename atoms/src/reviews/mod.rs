pub mod model;
pub mod service;

pub use model::{ReviewRecord, REVIEW_TYPE_CONTENT, REVIEW_TYPE_FULL, REVIEW_TYPE_IMAGE};
pub use service::*;
