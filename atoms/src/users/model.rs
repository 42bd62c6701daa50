use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub bio: Option<String>,
    pub photos: Vec<UserPhoto>,
    pub main_photo: Option<String>,
    pub num_of_photos: i32,
    pub is_under_review: bool,
    pub suspended_at: Option<String>,
    pub suspended_reason: Option<String>,
    pub user_created_at: String,
}

/// Element of a user's ordered photo collection.
/// sort_order 0 is the main photo slot; messages are present only when rejected.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserPhoto {
    pub path: String, // S3 key of the original upload
    pub sort_order: i32,
    pub is_rejected: bool,
    pub messages: Option<Vec<String>>,
    pub cropped_image_data: Option<serde_json::Value>,
    pub uploaded_at: String,
}
