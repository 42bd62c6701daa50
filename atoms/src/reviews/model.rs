use serde::{Deserialize, Serialize};

/// One pending (or human-flagged) unit of review work for a user.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReviewRecord {
    pub user_id: String,
    pub review_type: String, // image | content | full
    pub needs_human_review: Option<bool>,
    /// Structured analysis payload attached when a human follow-up is required
    pub analysis: Option<serde_json::Value>,
    pub created_at: String,
}

pub const REVIEW_TYPE_IMAGE: &str = "image";
pub const REVIEW_TYPE_CONTENT: &str = "content";
pub const REVIEW_TYPE_FULL: &str = "full";
