use std::collections::HashSet;
use std::sync::Arc;

use lambda_runtime::{Error, LambdaEvent};
use serde::Deserialize;

use amity_atoms::reviews::{self, ReviewRecord, REVIEW_TYPE_FULL, REVIEW_TYPE_IMAGE};
use amity_shared::AppState;
use moderation_block::client::ModerationApiClient;
use moderation_block::pipeline::{self, ReviewSummary};

/// Upper bound on records considered per invocation; the backlog query is
/// re-run from the start after each page because processed records delete
/// themselves out of it.
pub const REVIEW_PAGE_SIZE: usize = 5000;

/// Invocation payload. EventBridge sends an empty object on the schedule
/// (batch mode); the web app invokes with a user_id for an immediate
/// single-user review.
#[derive(Debug, Deserialize)]
pub struct ReviewEvent {
    #[serde(default)]
    pub user_id: Option<String>,
}

pub async fn function_handler(
    event: LambdaEvent<ReviewEvent>,
    state: Arc<AppState>,
    moderation_client: Arc<ModerationApiClient>,
) -> Result<serde_json::Value, Error> {
    match event.payload.user_id {
        Some(user_id) => review_single_user(&state, &moderation_client, &user_id).await,
        None => drain_pending_backlog(&state, &moderation_client).await,
    }
}

/// Single-user mode always runs a full review, regardless of whatever
/// review record may or may not exist for the user.
async fn review_single_user(
    state: &AppState,
    moderation_client: &ModerationApiClient,
    user_id: &str,
) -> Result<serde_json::Value, Error> {
    tracing::info!("Running full review for user {}", user_id);

    let summary = pipeline::review_user(state, moderation_client, user_id, REVIEW_TYPE_FULL)
        .await
        .map_err(Error::from)?;

    let (suspended, bio_violations) = match summary {
        Some(summary) => (summary.suspended, summary.bio_violations),
        None => (false, false),
    };

    if should_delete_record(REVIEW_TYPE_FULL, bio_violations) {
        reviews::delete_review(&state.dynamo_client, &state.table_name, user_id)
            .await
            .map_err(Error::from)?;
    }

    Ok(serde_json::json!({
        "user_id": user_id,
        "suspended": suspended,
        "flagged_for_human": bio_violations,
    }))
}

/// Batch mode: drain the current pending-review backlog once.
///
/// The backlog is re-queried from the start after every page because
/// completed records are deleted out of it. Records that survive a pass
/// (failures, human flags) are remembered in `attempted` so the loop
/// terminates instead of chewing on them forever; they get their retry on
/// the next scheduled invocation.
async fn drain_pending_backlog(
    state: &AppState,
    moderation_client: &ModerationApiClient,
) -> Result<serde_json::Value, Error> {
    let mut attempted: HashSet<String> = HashSet::new();
    let mut processed = 0usize;
    let mut suspended = 0usize;
    let mut failed = 0usize;

    loop {
        let page =
            reviews::list_pending_reviews(&state.dynamo_client, &state.table_name, REVIEW_PAGE_SIZE)
                .await
                .map_err(Error::from)?;

        let fresh: Vec<ReviewRecord> = page
            .into_iter()
            .filter(|record| !attempted.contains(&record.user_id))
            .collect();

        if fresh.is_empty() {
            break;
        }

        for record in fresh {
            attempted.insert(record.user_id.clone());

            // One bad record must never stop the batch
            match process_record(state, moderation_client, &record).await {
                Ok(summary) => {
                    processed += 1;
                    if summary.map(|s| s.suspended).unwrap_or(false) {
                        suspended += 1;
                        tracing::info!(
                            "User {} was suspended during batch review",
                            record.user_id
                        );
                    }
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!(
                        "Review failed for user {}, continuing batch: {}",
                        record.user_id,
                        e
                    );
                }
            }
        }
    }

    tracing::info!(
        "Backlog drained: {} processed, {} suspended, {} failed",
        processed,
        suspended,
        failed
    );

    Ok(serde_json::json!({
        "processed": processed,
        "suspended": suspended,
        "failed": failed,
    }))
}

async fn process_record(
    state: &AppState,
    moderation_client: &ModerationApiClient,
    record: &ReviewRecord,
) -> Result<Option<ReviewSummary>, String> {
    let summary =
        pipeline::review_user(state, moderation_client, &record.user_id, &record.review_type)
            .await?;

    match &summary {
        None => {
            // User vanished since the record was written; drop the orphan
            reviews::delete_review(&state.dynamo_client, &state.table_name, &record.user_id)
                .await?;
        }
        Some(summary) => {
            if should_delete_record(&record.review_type, summary.bio_violations) {
                reviews::delete_review(&state.dynamo_client, &state.table_name, &record.user_id)
                    .await?;
            }
            // Otherwise the bio stage already rewrote the record with
            // needs_human_review=true; it stays until a human clears it.
        }
    }

    Ok(summary)
}

/// A review record is deleted when an image-only review completes, or when
/// a content/full review completes without bio violations.
fn should_delete_record(review_type: &str, bio_violations: bool) -> bool {
    review_type == REVIEW_TYPE_IMAGE || !bio_violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use amity_atoms::reviews::REVIEW_TYPE_CONTENT;

    #[test]
    fn image_reviews_always_delete_their_record() {
        assert!(should_delete_record(REVIEW_TYPE_IMAGE, false));
        assert!(should_delete_record(REVIEW_TYPE_IMAGE, true));
    }

    #[test]
    fn content_reviews_keep_record_only_on_violations() {
        assert!(should_delete_record(REVIEW_TYPE_CONTENT, false));
        assert!(!should_delete_record(REVIEW_TYPE_CONTENT, true));
        assert!(should_delete_record(REVIEW_TYPE_FULL, false));
        assert!(!should_delete_record(REVIEW_TYPE_FULL, true));
    }
}
