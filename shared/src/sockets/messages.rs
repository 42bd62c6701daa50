use amity_atoms::users::UserPhoto;
use serde::Serialize;

/// Realtime event names emitted by the review worker
pub const EVENT_PHOTOS_APPROVED: &str = "account:photosApproved";
pub const EVENT_PHOTOS_NOT_APPROVED: &str = "account:photosNotApproved";

/// Envelope pushed to connected clients
#[derive(Debug, Serialize)]
pub struct RealtimeEvent {
    pub event: String,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

impl RealtimeEvent {
    pub fn new(event: &str, data: serde_json::Value) -> Self {
        Self {
            event: event.to_string(),
            data,
        }
    }
}

/// Payload for both photo-review outcome events
#[derive(Debug, Serialize)]
pub struct PhotoReviewPayload {
    pub rejected: Vec<UserPhoto>,
    pub approved: Vec<UserPhoto>,
}
