use amity_atoms::users::{self, UserPhoto};
use amity_shared::AppState;

/// Path of the photo that should be the profile thumbnail: the first
/// non-rejected photo in sort order, or none.
pub fn expected_main_photo(photos: &[UserPhoto]) -> Option<String> {
    photos
        .iter()
        .filter(|photo| !photo.is_rejected)
        .min_by_key(|photo| photo.sort_order)
        .map(|photo| photo.path.clone())
}

/// Count of photos visible on the public profile.
pub fn expected_photo_count(photos: &[UserPhoto]) -> i32 {
    photos.iter().filter(|photo| !photo.is_rejected).count() as i32
}

/// Re-read the user and correct main_photo / num_of_photos where stale.
/// Only fields that actually differ are written; a fully consistent profile
/// produces no write at all.
pub async fn reconcile_profile_state(state: &AppState, user_id: &str) -> Result<(), String> {
    let user = match users::get_user(&state.dynamo_client, &state.table_name, user_id).await? {
        Some(user) => user,
        None => return Ok(()),
    };

    let main_photo = expected_main_photo(&user.photos);
    let num_of_photos = expected_photo_count(&user.photos);

    let main_photo_update = if main_photo != user.main_photo {
        Some(main_photo)
    } else {
        None
    };
    let count_update = if num_of_photos != user.num_of_photos {
        Some(num_of_photos)
    } else {
        None
    };

    if main_photo_update.is_some() || count_update.is_some() {
        tracing::info!(
            "Reconciling profile state for user {}: main_photo changed: {}, count changed: {}",
            user_id,
            main_photo_update.is_some(),
            count_update.is_some()
        );
        users::reconcile_profile(
            &state.dynamo_client,
            &state.table_name,
            user_id,
            main_photo_update,
            count_update,
        )
        .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(path: &str, sort_order: i32, is_rejected: bool) -> UserPhoto {
        UserPhoto {
            path: path.to_string(),
            sort_order,
            is_rejected,
            messages: None,
            cropped_image_data: None,
            uploaded_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn main_photo_is_first_non_rejected_in_sort_order() {
        let photos = vec![
            photo("c.jpg", 2, false),
            photo("a.jpg", 0, true),
            photo("b.jpg", 1, false),
        ];
        assert_eq!(expected_main_photo(&photos), Some("b.jpg".to_string()));
    }

    #[test]
    fn no_visible_photos_means_no_main_photo() {
        let photos = vec![photo("a.jpg", 0, true), photo("b.jpg", 1, true)];
        assert_eq!(expected_main_photo(&photos), None);
        assert_eq!(expected_photo_count(&photos), 0);
    }

    #[test]
    fn count_ignores_rejected_photos() {
        let photos = vec![
            photo("a.jpg", 0, false),
            photo("b.jpg", 1, true),
            photo("c.jpg", 2, false),
        ];
        assert_eq!(expected_photo_count(&photos), 2);
    }

    #[test]
    fn empty_photo_set_is_consistent() {
        assert_eq!(expected_main_photo(&[]), None);
        assert_eq!(expected_photo_count(&[]), 0);
    }
}
