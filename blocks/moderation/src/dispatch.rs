use amity_atoms::notifications::{
    self, NOTIFICATION_PHOTOS_APPROVED, NOTIFICATION_PHOTOS_NOT_APPROVED,
};
use amity_atoms::users::UserPhoto;
use amity_shared::sockets::{
    emit_to_user, PhotoReviewPayload, RealtimeEvent, EVENT_PHOTOS_APPROVED,
    EVENT_PHOTOS_NOT_APPROVED,
};
use amity_shared::AppState;

/// Split a reviewed photo set into (rejected, approved).
pub fn partition_outcome(photos: &[UserPhoto]) -> (Vec<UserPhoto>, Vec<UserPhoto>) {
    photos
        .iter()
        .cloned()
        .partition(|photo| photo.is_rejected)
}

/// Notification type for a review pass: one rejection anywhere makes the
/// whole pass a "not approved" outcome.
pub fn outcome_notification_type(rejected: &[UserPhoto]) -> &'static str {
    if rejected.is_empty() {
        NOTIFICATION_PHOTOS_APPROVED
    } else {
        NOTIFICATION_PHOTOS_NOT_APPROVED
    }
}

/// Tell the user how the review went: replace any previous outcome
/// notifications with exactly one new one, then push the realtime event.
/// Everything here is best-effort; failures are logged and never undo the
/// photo state already persisted.
pub async fn dispatch_review_outcome(state: &AppState, user_id: &str, photos: &[UserPhoto]) {
    let (rejected, approved) = partition_outcome(photos);
    let notification_type = outcome_notification_type(&rejected);

    // Step A: clear previous outcome notifications, both kinds
    for stale_type in [NOTIFICATION_PHOTOS_APPROVED, NOTIFICATION_PHOTOS_NOT_APPROVED] {
        if let Err(e) = notifications::delete_notifications(
            &state.dynamo_client,
            &state.table_name,
            user_id,
            stale_type,
        )
        .await
        {
            tracing::warn!(
                "Failed to clear {} notifications for user {}: {}",
                stale_type,
                user_id,
                e
            );
        }
    }

    // Step B: persist the new outcome
    let payload = PhotoReviewPayload {
        rejected,
        approved,
    };
    let content = match serde_json::to_value(&payload) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(
                "Failed to serialize review outcome for user {}: {}",
                user_id,
                e
            );
            return;
        }
    };

    if let Err(e) = notifications::create_notification(
        &state.dynamo_client,
        &state.table_name,
        user_id,
        notification_type,
        &content,
    )
    .await
    {
        tracing::warn!(
            "Failed to create {} notification for user {}: {}",
            notification_type,
            user_id,
            e
        );
    }

    // Step C: realtime push, fire-and-forget
    if let Some(apigw_client) = &state.apigw_client {
        let event_name = if notification_type == NOTIFICATION_PHOTOS_NOT_APPROVED {
            EVENT_PHOTOS_NOT_APPROVED
        } else {
            EVENT_PHOTOS_APPROVED
        };
        let event = RealtimeEvent::new(event_name, content);
        emit_to_user(
            &state.dynamo_client,
            apigw_client,
            &state.table_name,
            user_id,
            &event,
        )
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(path: &str, is_rejected: bool) -> UserPhoto {
        UserPhoto {
            path: path.to_string(),
            sort_order: 0,
            is_rejected,
            messages: None,
            cropped_image_data: None,
            uploaded_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn partition_splits_by_rejection() {
        let photos = vec![
            photo("a.jpg", false),
            photo("b.jpg", true),
            photo("c.jpg", false),
        ];
        let (rejected, approved) = partition_outcome(&photos);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].path, "b.jpg");
        assert_eq!(approved.len(), 2);
    }

    #[test]
    fn any_rejection_makes_pass_not_approved() {
        let rejected = vec![photo("b.jpg", true)];
        assert_eq!(
            outcome_notification_type(&rejected),
            NOTIFICATION_PHOTOS_NOT_APPROVED
        );
        assert_eq!(outcome_notification_type(&[]), NOTIFICATION_PHOTOS_APPROVED);
    }
}
