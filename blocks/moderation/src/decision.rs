use amity_atoms::users::UserPhoto;

use crate::report::AnalysisReport;
use crate::similarity::DUPLICATE_MESSAGE;

/// Substrings that escalate a photo rejection into an account suspension.
/// Matched case-insensitively against the rejection messages. The typed
/// flags on AnalysisReport are the locale-independent replacement for this
/// once the stored message format stops being load-bearing.
pub const SUSPEND_KEYWORDS: [&str; 4] = ["violence", "gore", "nudity", "scam"];

/// Reason stored on the account when the review suspends it.
pub const SUSPENSION_REASON: &str =
    "Account suspended: profile content violates community guidelines";

/// Apply a photo's analysis report to the photo itself. Any message means
/// rejection; none means the photo is (re-)approved.
pub fn apply_report(photo: &mut UserPhoto, report: &AnalysisReport) {
    if report.messages.is_empty() {
        photo.is_rejected = false;
        photo.messages = None;
    } else {
        photo.is_rejected = true;
        photo.messages = Some(report.messages.clone());
    }
}

/// Reject a photo that duplicates another photo of the same user.
pub fn reject_as_duplicate(photo: &mut UserPhoto) {
    photo.is_rejected = true;
    photo.messages = Some(vec![DUPLICATE_MESSAGE.to_string()]);
}

/// Set-level rule over one user's reviewed photos: any rejection carrying a
/// high-severity keyword ends the pass with an account suspension.
pub fn should_suspend(photos: &[UserPhoto]) -> bool {
    photos
        .iter()
        .filter(|photo| photo.is_rejected)
        .flat_map(|photo| photo.messages.iter().flatten())
        .any(|message| {
            let lowered = message.to_lowercase();
            SUSPEND_KEYWORDS
                .iter()
                .any(|keyword| lowered.contains(keyword))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::summarize;

    fn photo(path: &str) -> UserPhoto {
        UserPhoto {
            path: path.to_string(),
            sort_order: 0,
            is_rejected: false,
            messages: None,
            cropped_image_data: None,
            uploaded_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn rejected(path: &str, message: &str) -> UserPhoto {
        let mut p = photo(path);
        p.is_rejected = true;
        p.messages = Some(vec![message.to_string()]);
        p
    }

    #[test]
    fn empty_report_approves_photo() {
        let mut p = rejected("a.jpg", "Photo contains weapons");
        let report = summarize(
            &serde_json::from_str(r#"{"status": "success", "weapon": {"prob": 0.1}}"#).unwrap(),
        )
        .unwrap();

        apply_report(&mut p, &report);
        assert!(!p.is_rejected);
        assert_eq!(p.messages, None);
    }

    #[test]
    fn report_messages_reject_photo_verbatim() {
        let mut p = photo("a.jpg");
        let report = summarize(
            &serde_json::from_str(r#"{"status": "success", "weapon": {"prob": 0.9}}"#).unwrap(),
        )
        .unwrap();

        apply_report(&mut p, &report);
        assert!(p.is_rejected);
        assert_eq!(p.messages, Some(vec!["Photo contains weapons".to_string()]));
    }

    #[test]
    fn duplicate_rejection_uses_fixed_message() {
        let mut p = photo("a.jpg");
        reject_as_duplicate(&mut p);
        assert!(p.is_rejected);
        assert_eq!(p.messages, Some(vec![DUPLICATE_MESSAGE.to_string()]));
    }

    #[test]
    fn high_severity_rejection_suspends() {
        let photos = vec![
            photo("a.jpg"),
            rejected("b.jpg", "Photo contains full nudity"),
        ];
        assert!(should_suspend(&photos));
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let photos = vec![rejected("a.jpg", "PHOTO CONTAINS GORE")];
        assert!(should_suspend(&photos));
    }

    #[test]
    fn low_severity_rejection_does_not_suspend() {
        let photos = vec![
            rejected("a.jpg", "Photo contains tobacco"),
            rejected("b.jpg", DUPLICATE_MESSAGE),
        ];
        assert!(!should_suspend(&photos));
    }

    #[test]
    fn approved_photo_messages_are_ignored() {
        // A non-rejected photo cannot carry messages, but the rule must not
        // depend on that invariant holding.
        let mut p = photo("a.jpg");
        p.messages = Some(vec!["Photo contains violence".to_string()]);
        assert!(!should_suspend(&[p]));
    }
}
