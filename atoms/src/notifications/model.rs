use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Notification {
    pub notification_id: String,
    pub recipient_id: String,
    pub notification_type: String, // photosApproved | photosNotApproved
    pub content: serde_json::Value,
    pub created_at: String,
}

pub const NOTIFICATION_PHOTOS_APPROVED: &str = "photosApproved";
pub const NOTIFICATION_PHOTOS_NOT_APPROVED: &str = "photosNotApproved";
