use amity_atoms::reviews::{self, REVIEW_TYPE_CONTENT};
use amity_atoms::users::{self, User};
use amity_shared::AppState;

use crate::client::ModerationApiClient;

/// Moderate a user's bio text. Returns whether violations were found.
///
/// Unlike the photo path, a failing text endpoint is a soft failure: the
/// bio is treated as clean for this pass and the rest of the review
/// proceeds. Violations never suspend; they flag the profile for a human.
pub async fn review_bio(
    state: &AppState,
    moderation_client: &ModerationApiClient,
    user: &User,
) -> Result<bool, String> {
    let bio = match &user.bio {
        Some(bio) if !bio.trim().is_empty() => bio,
        _ => return Ok(false),
    };

    let response = match moderation_client.check_text(bio).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(
                "Text moderation failed for user {}, treating as no violation: {}",
                user.user_id,
                e
            );
            return Ok(false);
        }
    };

    if response.violations.is_empty() {
        return Ok(false);
    }

    tracing::info!(
        "Bio violations found for user {}: {} entries, flagging for human review",
        user.user_id,
        response.violations.len()
    );

    users::set_under_review(&state.dynamo_client, &state.table_name, &user.user_id).await?;

    let analysis = serde_json::json!({
        "bio": bio,
        "violations": response.violations,
    });
    reviews::upsert_review(
        &state.dynamo_client,
        &state.table_name,
        &user.user_id,
        REVIEW_TYPE_CONTENT,
        true,
        Some(&analysis),
    )
    .await?;

    Ok(true)
}
