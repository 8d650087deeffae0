//! Stage records. Each stage output embeds the previous stage's record through
//! `#[serde(flatten)]`, so a later stage can only add fields, and the persisted
//! JSON stays one flat object per candidate.

use serde::{Deserialize, Serialize};

/// Output of the parsing stage: one record per successfully extracted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    /// Stable key. No stage renames it.
    pub file_name: String,
    /// First N characters of the extracted text.
    #[serde(default)]
    pub raw: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub names_orgs: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub dates: Vec<String>,
    /// Untruncated text, only present when an external parser supplies it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
}

impl ParsedResume {
    /// Text the recruiter stage reads: `raw`, or `full_text` when `raw` is empty.
    pub fn source_text(&self) -> &str {
        if self.raw.is_empty() {
            self.full_text.as_deref().unwrap_or_default()
        } else {
            &self.raw
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecruiterRecord {
    #[serde(flatten)]
    pub parsed: ParsedResume,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub clean_text: String,
    /// 0, 50 or 100.
    #[serde(default)]
    pub recruiter_score: u8,
    #[serde(default)]
    pub recruiter_feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AnalystRecordRepr")]
pub struct AnalystRecord {
    #[serde(flatten)]
    pub recruiter: RecruiterRecord,
    /// 0.0 – 100.0, two decimals.
    pub match_score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub analyst_feedback: String,
}

/// Wire shape of an analyst record. Older snapshots name the score
/// `analyst_score`, and some carry both keys.
#[derive(Deserialize)]
struct AnalystRecordRepr {
    #[serde(flatten)]
    recruiter: RecruiterRecord,
    #[serde(default)]
    match_score: Option<f64>,
    #[serde(default)]
    analyst_score: Option<f64>,
    #[serde(default)]
    matched_skills: Vec<String>,
    #[serde(default)]
    missing_skills: Vec<String>,
    #[serde(default)]
    analyst_feedback: String,
}

impl From<AnalystRecordRepr> for AnalystRecord {
    fn from(repr: AnalystRecordRepr) -> Self {
        Self {
            recruiter: repr.recruiter,
            match_score: repr.match_score.or(repr.analyst_score).unwrap_or_default(),
            matched_skills: repr.matched_skills,
            missing_skills: repr.missing_skills,
            analyst_feedback: repr.analyst_feedback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrRecord {
    #[serde(flatten)]
    pub analyst: AnalystRecord,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub hr_score: u8,
    #[serde(default)]
    pub hr_feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub hr: HrRecord,
    pub recommendation_score: f64,
    #[serde(default)]
    pub recommendation_feedback: Option<String>,
}

// Read-through accessors so callers don't spell out the whole nesting chain.

impl RecruiterRecord {
    pub fn file_name(&self) -> &str {
        &self.parsed.file_name
    }
}

impl AnalystRecord {
    pub fn file_name(&self) -> &str {
        self.recruiter.file_name()
    }
}

impl HrRecord {
    pub fn file_name(&self) -> &str {
        self.analyst.file_name()
    }

    pub fn recruiter(&self) -> &RecruiterRecord {
        &self.analyst.recruiter
    }

    pub fn parsed(&self) -> &ParsedResume {
        &self.analyst.recruiter.parsed
    }
}

impl Recommendation {
    pub fn file_name(&self) -> &str {
        self.hr.file_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hr_record_serializes_flat() {
        let record = HrRecord {
            analyst: AnalystRecord {
                recruiter: RecruiterRecord {
                    parsed: ParsedResume {
                        file_name: "a.pdf".to_string(),
                        raw: "Jane".to_string(),
                        skills: vec!["python".to_string()],
                        names_orgs: vec![],
                        locations: vec![],
                        dates: vec![],
                        full_text: None,
                    },
                    email: None,
                    phone: Some("+1 555 123 4567".to_string()),
                    clean_text: "Jane".to_string(),
                    recruiter_score: 50,
                    recruiter_feedback: "Missing email.".to_string(),
                },
                match_score: 42.5,
                matched_skills: vec![],
                missing_skills: vec![],
                analyst_feedback: String::new(),
            },
            soft_skills: vec![],
            red_flags: vec![],
            hr_score: 50,
            hr_feedback: None,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["file_name"], "a.pdf");
        assert_eq!(value["email"], serde_json::Value::Null);
        assert_eq!(value["recruiter_score"], 50);
        assert_eq!(value["match_score"], 42.5);
        assert_eq!(value["hr_score"], 50);
        assert!(value.get("full_text").is_none());
        assert!(value.get("parsed").is_none(), "nesting must not leak into JSON");
    }

    #[test]
    fn test_legacy_analyst_score_key_is_accepted() {
        let value = json!({
            "file_name": "b.docx",
            "raw": "",
            "skills": [],
            "email": null,
            "phone": null,
            "clean_text": "",
            "recruiter_score": 0,
            "recruiter_feedback": "",
            "analyst_score": 61.25
        });
        let record: AnalystRecord = serde_json::from_value(value).unwrap();
        assert!((record.match_score - 61.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_record_with_both_score_keys_loads() {
        let value = json!({
            "file_name": "e.pdf",
            "email": null,
            "phone": null,
            "clean_text": "",
            "recruiter_score": 50,
            "analyst_score": 12.0,
            "match_score": 61.25,
            "soft_skills": ["teamwork"],
            "hr_score": 60
        });
        let analyst: AnalystRecord = serde_json::from_value(value.clone()).unwrap();
        assert!((analyst.match_score - 61.25).abs() < f64::EPSILON);

        let hr: HrRecord = serde_json::from_value(value).unwrap();
        assert!((hr.analyst.match_score - 61.25).abs() < f64::EPSILON);
        assert_eq!(hr.hr_score, 60);
        assert_eq!(hr.soft_skills, vec!["teamwork"]);

        let out = serde_json::to_value(&hr).unwrap();
        assert!(out.get("analyst_score").is_none());
        assert_eq!(out["match_score"], 61.25);
    }

    #[test]
    fn test_absent_hr_score_defaults_to_zero() {
        let value = json!({
            "file_name": "c.pdf",
            "email": null,
            "phone": null,
            "match_score": 10.0
        });
        let record: HrRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.hr_score, 0);
        assert_eq!(record.recruiter().recruiter_score, 0);
        assert!(record.hr_feedback.is_none());
    }

    #[test]
    fn test_source_text_falls_back_to_full_text() {
        let parsed = ParsedResume {
            file_name: "d.pdf".to_string(),
            raw: String::new(),
            skills: vec![],
            names_orgs: vec![],
            locations: vec![],
            dates: vec![],
            full_text: Some("full body".to_string()),
        };
        assert_eq!(parsed.source_text(), "full body");
    }
}
