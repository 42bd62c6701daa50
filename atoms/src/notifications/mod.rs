pub mod model;
pub mod service;

pub use model::{
    Notification, NOTIFICATION_PHOTOS_APPROVED, NOTIFICATION_PHOTOS_NOT_APPROVED,
};
pub use service::*;
