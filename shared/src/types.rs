// ========== USER ==========
pub use amity_atoms::users::model::{User, UserPhoto};

// ========== REVIEW ==========
pub use amity_atoms::reviews::model::{
    ReviewRecord, REVIEW_TYPE_CONTENT, REVIEW_TYPE_FULL, REVIEW_TYPE_IMAGE,
};

// ========== NOTIFICATION ==========
pub use amity_atoms::notifications::model::{
    Notification, NOTIFICATION_PHOTOS_APPROVED, NOTIFICATION_PHOTOS_NOT_APPROVED,
};
