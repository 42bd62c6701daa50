use serde::{Deserialize, Serialize};

/// Score at or above which a category counts as a likely positive.
pub const LIKELY_POSITIVE: f64 = 0.85;

/// Higher bar for false-positive-sensitive signals (generated imagery,
/// minor detection); flagging these wrongly is worse than missing them.
pub const NEAR_CERTAIN: f64 = 0.98;

// ---------- Raw vendor response ----------

/// Vendor response for one image check, keyed by model name.
/// Models not requested (or not returned) simply stay None.
#[derive(Debug, Deserialize, Default)]
pub struct ImageCheckResponse {
    pub status: String, // success | failure
    pub error: Option<VendorError>,
    pub nudity: Option<RawNudity>,
    pub weapon: Option<RawScore>,
    pub recreational_drug: Option<RawScore>,
    pub medical: Option<RawScore>,
    pub offensive: Option<RawScore>,
    pub gore: Option<RawScore>,
    pub violence: Option<RawScore>,
    #[serde(rename = "self-harm")]
    pub self_harm: Option<RawScore>,
    pub scam: Option<RawScore>,
    pub gambling: Option<RawScore>,
    pub tobacco: Option<RawScore>,
    #[serde(rename = "type")]
    pub media_type: Option<RawMediaType>,
    pub qr: Option<RawQr>,
    pub text: Option<RawText>,
    pub faces: Option<Vec<RawFace>>,
}

#[derive(Debug, Deserialize)]
pub struct VendorError {
    pub code: Option<i64>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawScore {
    pub prob: f64,
}

#[derive(Debug, Deserialize)]
pub struct RawNudity {
    #[serde(default)]
    pub raw: f64,
    #[serde(default)]
    pub partial: f64,
    #[serde(default)]
    pub safe: f64,
}

#[derive(Debug, Deserialize)]
pub struct RawMediaType {
    pub ai_generated: Option<f64>,
    pub photo: Option<f64>,
    pub illustration: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RawQr {
    #[serde(default)]
    pub personal: Vec<serde_json::Value>,
    #[serde(default)]
    pub link: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct RawText {
    #[serde(default)]
    pub profanity: Vec<serde_json::Value>,
    #[serde(default)]
    pub personal: Vec<serde_json::Value>,
    #[serde(default)]
    pub link: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct RawFace {
    pub attributes: Option<RawFaceAttributes>,
}

#[derive(Debug, Deserialize)]
pub struct RawFaceAttributes {
    pub minor: Option<f64>,
}

// ---------- Normalized report ----------

/// Normalized violation report for one photo (or one bio). A fixed struct,
/// never an open dictionary: one optional sub-report per category plus the
/// aggregated message list. An empty message list means approved.
#[derive(Debug, Serialize, Default)]
pub struct AnalysisReport {
    pub nudity: Option<NudityReport>,
    pub weapon: Option<ScoreReport>,
    pub recreational_drug: Option<ScoreReport>,
    pub medical: Option<ScoreReport>,
    pub offensive: Option<ScoreReport>,
    pub gore: Option<ScoreReport>,
    pub violence: Option<ScoreReport>,
    pub self_harm: Option<ScoreReport>,
    pub scam: Option<ScoreReport>,
    pub gambling: Option<ScoreReport>,
    pub tobacco: Option<ScoreReport>,
    pub ai_generated: Option<ScoreReport>,
    pub is_illustration: Option<ScoreReport>,
    pub qr_content: Option<QrReport>,
    pub text: Option<TextReport>,
    pub faces: Option<FacesReport>,
    pub messages: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NudityReport {
    pub raw: f64,
    pub partial: f64,
    pub is_nude: bool,
    pub is_partial_nude: bool,
}

#[derive(Debug, Serialize)]
pub struct ScoreReport {
    pub score: f64,
    pub flagged: bool,
}

#[derive(Debug, Serialize)]
pub struct QrReport {
    pub has_personal: bool,
    pub has_link: bool,
}

#[derive(Debug, Serialize)]
pub struct TextReport {
    pub has_profanity: bool,
    pub has_personal: bool,
    pub has_link: bool,
}

#[derive(Debug, Serialize)]
pub struct FacesReport {
    pub count: usize,
    pub minor_detected: bool,
}

/// Map a raw vendor response into the normalized report. Fails when the
/// vendor reports anything but success; a response we cannot interpret is a
/// hard error for the user under review.
pub fn summarize(response: &ImageCheckResponse) -> Result<AnalysisReport, String> {
    if response.status != "success" {
        let detail = response
            .error
            .as_ref()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| "no error detail".to_string());
        return Err(format!("Moderation analysis failed: {}", detail));
    }

    let mut report = AnalysisReport::default();
    let mut messages: Vec<String> = Vec::new();

    if let Some(nudity) = &response.nudity {
        let is_nude = nudity.raw >= LIKELY_POSITIVE;
        let is_partial_nude = nudity.partial >= LIKELY_POSITIVE;
        if is_nude {
            messages.push("Photo contains full nudity".to_string());
        } else if is_partial_nude {
            messages.push("Photo contains partial nudity".to_string());
        }
        report.nudity = Some(NudityReport {
            raw: nudity.raw,
            partial: nudity.partial,
            is_nude,
            is_partial_nude,
        });
    }

    report.weapon = score_category(&response.weapon, "Photo contains weapons", &mut messages);
    report.recreational_drug = score_category(
        &response.recreational_drug,
        "Photo contains recreational drugs",
        &mut messages,
    );
    report.medical = score_category(
        &response.medical,
        "Photo contains medical content",
        &mut messages,
    );
    report.offensive = score_category(
        &response.offensive,
        "Photo contains offensive gestures or symbols",
        &mut messages,
    );
    report.gore = score_category(&response.gore, "Photo contains gore", &mut messages);
    report.violence = score_category(&response.violence, "Photo contains violence", &mut messages);
    report.self_harm = score_category(
        &response.self_harm,
        "Photo contains self-harm",
        &mut messages,
    );
    report.scam = score_category(
        &response.scam,
        "Photo appears to be part of a scam",
        &mut messages,
    );
    report.gambling = score_category(&response.gambling, "Photo contains gambling", &mut messages);
    report.tobacco = score_category(&response.tobacco, "Photo contains tobacco", &mut messages);

    if let Some(media_type) = &response.media_type {
        if let Some(score) = media_type.ai_generated {
            let flagged = score >= NEAR_CERTAIN;
            if flagged {
                messages.push("Photo appears to be AI-generated".to_string());
            }
            report.ai_generated = Some(ScoreReport { score, flagged });
        }
        if let Some(score) = media_type.illustration {
            let flagged = score >= LIKELY_POSITIVE;
            if flagged {
                messages.push("Photo appears to be an illustration, not a photo".to_string());
            }
            report.is_illustration = Some(ScoreReport { score, flagged });
        }
    }

    if let Some(qr) = &response.qr {
        let has_personal = !qr.personal.is_empty();
        let has_link = !qr.link.is_empty();
        if has_personal || has_link {
            messages.push("Photo contains a QR code".to_string());
        }
        report.qr_content = Some(QrReport {
            has_personal,
            has_link,
        });
    }

    if let Some(text) = &response.text {
        let has_profanity = !text.profanity.is_empty();
        let has_personal = !text.personal.is_empty();
        let has_link = !text.link.is_empty();
        if has_profanity {
            messages.push("Photo contains profanity in overlaid text".to_string());
        }
        if has_personal {
            messages.push("Photo contains personal information".to_string());
        }
        if has_link {
            messages.push("Photo contains a link".to_string());
        }
        report.text = Some(TextReport {
            has_profanity,
            has_personal,
            has_link,
        });
    }

    if let Some(faces) = &response.faces {
        let minor_detected = faces.iter().any(|face| {
            face.attributes
                .as_ref()
                .and_then(|a| a.minor)
                .map(|score| score >= NEAR_CERTAIN)
                .unwrap_or(false)
        });
        if minor_detected {
            messages.push("Photo appears to include a minor".to_string());
        }
        report.faces = Some(FacesReport {
            count: faces.len(),
            minor_detected,
        });
    }

    report.messages = messages;
    Ok(report)
}

fn score_category(
    raw: &Option<RawScore>,
    message: &str,
    messages: &mut Vec<String>,
) -> Option<ScoreReport> {
    raw.as_ref().map(|raw| {
        let flagged = raw.prob >= LIKELY_POSITIVE;
        if flagged {
            messages.push(message.to_string());
        }
        ScoreReport {
            score: raw.prob,
            flagged,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> ImageCheckResponse {
        serde_json::from_str(body).expect("valid vendor json")
    }

    #[test]
    fn clean_response_yields_empty_messages() {
        let response = parse(
            r#"{
                "status": "success",
                "nudity": {"raw": 0.01, "partial": 0.02, "safe": 0.97},
                "weapon": {"prob": 0.0},
                "gore": {"prob": 0.01},
                "faces": [{"attributes": {"minor": 0.1}}]
            }"#,
        );

        let report = summarize(&response).expect("summarize");
        assert!(report.messages.is_empty());
        assert!(!report.nudity.as_ref().unwrap().is_nude);
        assert!(!report.faces.as_ref().unwrap().minor_detected);
        assert_eq!(report.faces.as_ref().unwrap().count, 1);
    }

    #[test]
    fn nudity_above_threshold_flags_and_messages() {
        let response = parse(
            r#"{
                "status": "success",
                "nudity": {"raw": 0.90, "partial": 0.10, "safe": 0.05}
            }"#,
        );

        let report = summarize(&response).expect("summarize");
        let nudity = report.nudity.as_ref().unwrap();
        assert!(nudity.is_nude);
        assert!(!nudity.is_partial_nude);
        assert_eq!(report.messages, vec!["Photo contains full nudity"]);
    }

    #[test]
    fn partial_nudity_gets_its_own_message() {
        let response = parse(
            r#"{
                "status": "success",
                "nudity": {"raw": 0.10, "partial": 0.88, "safe": 0.05}
            }"#,
        );

        let report = summarize(&response).expect("summarize");
        assert_eq!(report.messages, vec!["Photo contains partial nudity"]);
    }

    #[test]
    fn category_threshold_is_inclusive() {
        let response = parse(r#"{"status": "success", "weapon": {"prob": 0.85}}"#);
        let report = summarize(&response).expect("summarize");
        assert!(report.weapon.as_ref().unwrap().flagged);
        assert_eq!(report.messages, vec!["Photo contains weapons"]);
    }

    #[test]
    fn ai_generated_requires_near_certainty() {
        let below = parse(r#"{"status": "success", "type": {"ai_generated": 0.95}}"#);
        let report = summarize(&below).expect("summarize");
        assert!(!report.ai_generated.as_ref().unwrap().flagged);
        assert!(report.messages.is_empty());

        let above = parse(r#"{"status": "success", "type": {"ai_generated": 0.99}}"#);
        let report = summarize(&above).expect("summarize");
        assert!(report.ai_generated.as_ref().unwrap().flagged);
        assert_eq!(report.messages, vec!["Photo appears to be AI-generated"]);
    }

    #[test]
    fn minor_detection_requires_near_certainty() {
        let below = parse(r#"{"status": "success", "faces": [{"attributes": {"minor": 0.90}}]}"#);
        assert!(!summarize(&below)
            .expect("summarize")
            .faces
            .as_ref()
            .unwrap()
            .minor_detected);

        let above = parse(r#"{"status": "success", "faces": [{"attributes": {"minor": 0.99}}]}"#);
        let report = summarize(&above).expect("summarize");
        assert!(report.faces.as_ref().unwrap().minor_detected);
        assert_eq!(report.messages, vec!["Photo appears to include a minor"]);
    }

    #[test]
    fn multiple_violations_aggregate_in_order() {
        let response = parse(
            r#"{
                "status": "success",
                "nudity": {"raw": 0.90, "partial": 0.0, "safe": 0.0},
                "weapon": {"prob": 0.91},
                "text": {"profanity": [], "personal": [{"type": "phone"}], "link": []}
            }"#,
        );

        let report = summarize(&response).expect("summarize");
        assert_eq!(
            report.messages,
            vec![
                "Photo contains full nudity",
                "Photo contains weapons",
                "Photo contains personal information"
            ]
        );
    }

    #[test]
    fn vendor_failure_is_a_hard_error() {
        let response = parse(
            r#"{"status": "failure", "error": {"code": 401, "message": "invalid credentials"}}"#,
        );
        let err = summarize(&response).unwrap_err();
        assert!(err.contains("invalid credentials"));
    }
}
