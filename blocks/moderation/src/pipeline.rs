use std::path::{Path, PathBuf};

use amity_atoms::reviews::{REVIEW_TYPE_CONTENT, REVIEW_TYPE_FULL, REVIEW_TYPE_IMAGE};
use amity_atoms::users::{self, UserPhoto};
use amity_shared::AppState;

use crate::client::ModerationApiClient;
use crate::similarity::{self, NormalizedImage};
use crate::{bio, decision, dispatch, reconcile, report};

/// What one user's review pass concluded. The scheduler uses this to decide
/// whether the review record can be deleted.
#[derive(Debug, Clone, Copy)]
pub struct ReviewSummary {
    pub suspended: bool,
    pub bio_violations: bool,
}

/// Run a full review pass for one user. Returns Ok(None) when the user no
/// longer exists (the caller drops the orphaned review record).
///
/// Photos and bio are independent stages: the photo stage can suspend the
/// account and short-circuit everything after it; the bio stage only ever
/// flags for human follow-up.
pub async fn review_user(
    state: &AppState,
    moderation_client: &ModerationApiClient,
    user_id: &str,
    review_type: &str,
) -> Result<Option<ReviewSummary>, String> {
    let user = match users::get_user(&state.dynamo_client, &state.table_name, user_id).await? {
        Some(user) => user,
        None => {
            tracing::warn!("Review requested for missing user {}", user_id);
            return Ok(None);
        }
    };

    if user.suspended_at.is_some() {
        tracing::info!("User {} is already suspended, skipping review", user_id);
        return Ok(Some(ReviewSummary {
            suspended: true,
            bio_violations: false,
        }));
    }

    // STEP 1: photo stage
    let runs_photos = review_type == REVIEW_TYPE_IMAGE || review_type == REVIEW_TYPE_FULL;
    if runs_photos && !user.photos.is_empty() {
        let mut photos = user.photos.clone();
        run_photo_stage(state, moderation_client, user_id, &mut photos).await?;

        if decision::should_suspend(&photos) {
            users::set_suspended(
                &state.dynamo_client,
                &state.table_name,
                user_id,
                decision::SUSPENSION_REASON,
            )
            .await?;
            tracing::info!("User {} suspended after photo review", user_id);
            // Terminal outcome: no photo write, no reconciliation, no notification
            return Ok(Some(ReviewSummary {
                suspended: true,
                bio_violations: false,
            }));
        }

        users::update_user_photos(&state.dynamo_client, &state.table_name, user_id, &photos)
            .await?;
        reconcile::reconcile_profile_state(state, user_id).await?;
        dispatch::dispatch_review_outcome(state, user_id, &photos).await;
    }

    // STEP 2: bio stage (feature-flagged, flag-only, never suspends)
    let runs_bio = review_type == REVIEW_TYPE_CONTENT || review_type == REVIEW_TYPE_FULL;
    let mut bio_violations = false;
    if runs_bio && moderation_client.text_moderation_enabled() {
        bio_violations = bio::review_bio(state, moderation_client, &user).await?;
    }

    Ok(Some(ReviewSummary {
        suspended: false,
        bio_violations,
    }))
}

/// Download, duplicate-gate and moderate one user's photos, writing the
/// verdicts into `photos`. The temp dir holding the downloads is removed
/// best-effort whichever way the stage ends.
async fn run_photo_stage(
    state: &AppState,
    moderation_client: &ModerationApiClient,
    user_id: &str,
    photos: &mut [UserPhoto],
) -> Result<(), String> {
    let temp_dir =
        tempfile::tempdir().map_err(|e| format!("Failed to create temp dir: {}", e))?;

    let result = moderate_photos(state, moderation_client, user_id, photos, temp_dir.path()).await;

    if let Err(e) = temp_dir.close() {
        tracing::warn!("Failed to clean up temp dir for user {}: {}", user_id, e);
    }

    result
}

async fn moderate_photos(
    state: &AppState,
    moderation_client: &ModerationApiClient,
    user_id: &str,
    photos: &mut [UserPhoto],
    work_dir: &Path,
) -> Result<(), String> {
    // Step A: materialize every photo locally, in display order. Duplicate
    // detection needs the whole set before any pair can be compared.
    let mut order: Vec<usize> = (0..photos.len()).collect();
    order.sort_by_key(|&i| photos[i].sort_order);

    let mut local_paths: Vec<PathBuf> = Vec::with_capacity(order.len());
    for (slot, &i) in order.iter().enumerate() {
        let local_path = work_dir.join(local_file_name(slot, &photos[i].path));
        let bytes = download_photo(state, &photos[i].path).await?;
        tokio::fs::write(&local_path, &bytes)
            .await
            .map_err(|e| format!("Failed to write {}: {}", local_path.display(), e))?;
        local_paths.push(local_path);
    }

    let mut normalized: Vec<NormalizedImage> = Vec::with_capacity(order.len());
    for path in &local_paths {
        normalized.push(NormalizedImage::load(path)?);
    }

    // Step B: walk the set in display order; earlier photos win duplicate
    // contests, duplicates skip the paid vendor call entirely.
    let mut retained: Vec<&NormalizedImage> = Vec::new();
    for (slot, &i) in order.iter().enumerate() {
        if similarity::is_duplicate(&normalized[slot], &retained) {
            tracing::info!(
                "Photo {} of user {} is a duplicate, skipping moderation call",
                photos[i].path,
                user_id
            );
            decision::reject_as_duplicate(&mut photos[i]);
            continue;
        }

        let response = moderation_client.check_image(&local_paths[slot]).await?;
        let analysis = report::summarize(&response)?;
        decision::apply_report(&mut photos[i], &analysis);
        retained.push(&normalized[slot]);

        // A high-severity violation suspends the account; remaining photos
        // are not worth further paid calls.
        if photos[i].is_rejected && decision::should_suspend(photos) {
            tracing::info!(
                "High-severity violation for user {}, stopping photo review",
                user_id
            );
            break;
        }
    }

    Ok(())
}

async fn download_photo(state: &AppState, key: &str) -> Result<Vec<u8>, String> {
    let object = state
        .s3_client
        .get_object()
        .bucket(&state.media_bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| format!("S3 get_object error for {}: {}", key, e))?;

    let bytes = object
        .body
        .collect()
        .await
        .map_err(|e| format!("S3 body read error for {}: {}", key, e))?
        .into_bytes();

    Ok(bytes.to_vec())
}

/// Local file keeps the upload's extension so format detection still works.
fn local_file_name(slot: usize, key: &str) -> String {
    match Path::new(key).extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("photo_{}.{}", slot, ext),
        None => format!("photo_{}.jpg", slot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_file_name_keeps_extension() {
        assert_eq!(local_file_name(0, "media/u1/abc123.png"), "photo_0.png");
        assert_eq!(local_file_name(2, "media/u1/abc123"), "photo_2.jpg");
    }
}
