//! Persisted draft shape

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::survey::{PartialResponse, SurveyResponse};

/// Well-known key the draft lives under
pub const DEFAULT_DRAFT_KEY: &str = "survey-form-draft";

/// Snapshot written on every autosave
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSnapshot<'a> {
    pub form_data: &'a SurveyResponse,
    pub current_section: usize,
    pub last_saved: DateTime<Utc>,
}

/// Snapshot as read back; every part is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavedDraft {
    pub form_data: Option<PartialResponse>,
    pub current_section: Option<usize>,
    pub last_saved: Option<DateTime<Utc>>,
}

impl SavedDraft {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_keys() {
        let response = SurveyResponse {
            name: "Alice".into(),
            ..Default::default()
        };
        let snapshot = DraftSnapshot {
            form_data: &response,
            current_section: 3,
            last_saved: Utc::now(),
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["formData"]["name"], "Alice");
        assert_eq!(json["currentSection"], 3);
        assert!(json["lastSaved"].is_string());
    }

    #[test]
    fn test_saved_draft_round_trip() {
        let response = SurveyResponse {
            email: "alice@example.com".into(),
            ..Default::default()
        };
        let saved_at = Utc::now();
        let raw = serde_json::to_string(&DraftSnapshot {
            form_data: &response,
            current_section: 5,
            last_saved: saved_at,
        })
        .unwrap();

        let draft = SavedDraft::parse(&raw).unwrap();
        assert_eq!(draft.current_section, Some(5));
        assert_eq!(draft.last_saved, Some(saved_at));
        assert_eq!(
            draft.form_data.unwrap().email.as_deref(),
            Some("alice@example.com")
        );
    }

    #[test]
    fn test_saved_draft_tolerates_missing_parts() {
        let draft = SavedDraft::parse(r#"{"formData": {"name": "Alice"}}"#).unwrap();
        assert_eq!(draft.current_section, None);
        assert_eq!(draft.last_saved, None);

        assert!(SavedDraft::parse("not json").is_err());
    }
}
