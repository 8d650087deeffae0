//! Analyst stage: semantic match between a candidate and the job description.
//!
//! Two strategies, chosen by configuration:
//! - `Skills`: embed the candidate's skill list against the JD's significant words.
//! - `FullText`: embed the candidate's cleaned text against the full JD text.
//!
//! Under both, `matched_skills` / `missing_skills` are exact lower-cased token
//! sets, and an empty skill list short-circuits to a zero score without calling
//! the embedder.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::embedding::{text_similarity, Embedder, EmbedderSettings};
use crate::errors::PipelineError;
use crate::models::record::{AnalystRecord, RecruiterRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    #[default]
    Skills,
    FullText,
}

impl std::str::FromStr for MatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "skills" => Ok(Self::Skills),
            "full_text" => Ok(Self::FullText),
            other => Err(format!(
                "unknown analyst strategy '{other}' (expected skills|full_text)"
            )),
        }
    }
}

/// The job description as the analyst sees it.
#[derive(Debug, Clone)]
pub struct JobDescription {
    pub text: String,
    /// Lower-cased tokens longer than two characters, sorted and unique.
    pub significant_words: Vec<String>,
}

impl JobDescription {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let significant_words = significant_words(&text);
        Self {
            text,
            significant_words,
        }
    }
}

pub fn significant_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| c.is_ascii_punctuation() && c != '+' && c != '#')
                .to_lowercase()
        })
        .filter(|w| w.chars().count() > 2)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// (matched, missing): skills present in the JD words, and JD words not among the skills.
pub fn skill_overlap(skills: &[String], jd_words: &[String]) -> (Vec<String>, Vec<String>) {
    let skills: BTreeSet<String> = skills.iter().map(|s| s.to_lowercase()).collect();
    let jd: BTreeSet<&str> = jd_words.iter().map(String::as_str).collect();

    let matched = skills
        .iter()
        .filter(|s| jd.contains(s.as_str()))
        .cloned()
        .collect();
    let missing = jd
        .iter()
        .filter(|w| !skills.contains(**w))
        .map(|w| w.to_string())
        .collect();
    (matched, missing)
}

pub fn analyst_feedback(score: f64) -> String {
    if score > 75.0 {
        "Excellent alignment with job description."
    } else if score > 50.0 {
        "Moderate alignment with job description."
    } else if score > 30.0 {
        "Some relevant skills but also gaps."
    } else {
        "Low skill match. Consider for other roles."
    }
    .to_string()
}

/// Cosine similarity scaled to 0–100 and rounded to two decimals.
pub fn scale_similarity(similarity: f32) -> f64 {
    let scaled = (similarity as f64 * 100.0).clamp(0.0, 100.0);
    (scaled * 100.0).round() / 100.0
}

/// Holds the strategy and the embedding backend for one stage run.
/// The backend is built on the first embedding call and dropped with the stage.
pub struct AnalystStage {
    strategy: MatchStrategy,
    settings: Option<EmbedderSettings>,
    embedder: OnceCell<Arc<dyn Embedder>>,
}

impl AnalystStage {
    pub fn new(strategy: MatchStrategy, settings: EmbedderSettings) -> Self {
        Self {
            strategy,
            settings: Some(settings),
            embedder: OnceCell::new(),
        }
    }

    /// Uses an already-built backend.
    pub fn with_embedder(strategy: MatchStrategy, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            strategy,
            settings: None,
            embedder: OnceCell::from(embedder),
        }
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    async fn embedder(&self) -> Result<&Arc<dyn Embedder>, PipelineError> {
        self.embedder
            .get_or_try_init(|| async {
                let settings = self.settings.as_ref().ok_or_else(|| {
                    PipelineError::Embedding("no embedding backend configured".to_string())
                })?;
                let embedder = settings.build()?;
                info!("Embedding backend initialized: {}", embedder.name());
                Ok::<_, PipelineError>(embedder)
            })
            .await
    }

    /// Scores one record. Fails only when the embedding backend does.
    pub async fn score(
        &self,
        record: RecruiterRecord,
        jd: &JobDescription,
    ) -> Result<AnalystRecord, PipelineError> {
        let skills = &record.parsed.skills;

        if skills.is_empty() {
            debug!("{}: no skills extracted, scoring 0", record.file_name());
            return Ok(AnalystRecord {
                recruiter: record,
                match_score: 0.0,
                matched_skills: vec![],
                missing_skills: vec![],
                analyst_feedback: analyst_feedback(0.0),
            });
        }

        let (matched_skills, missing_skills) = skill_overlap(skills, &jd.significant_words);

        let (candidate_text, jd_text) = match self.strategy {
            MatchStrategy::Skills => (skills.join(" "), jd.significant_words.join(" ")),
            MatchStrategy::FullText => {
                let text = if record.clean_text.is_empty() {
                    record.parsed.source_text().to_string()
                } else {
                    record.clean_text.clone()
                };
                (text, jd.text.clone())
            }
        };

        let embedder = self.embedder().await?;
        let similarity = text_similarity(embedder.as_ref(), &candidate_text, &jd_text).await?;
        let match_score = scale_similarity(similarity);
        debug!("{}: match_score={match_score}", record.file_name());

        Ok(AnalystRecord {
            recruiter: record,
            match_score,
            matched_skills,
            missing_skills,
            analyst_feedback: analyst_feedback(match_score),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{EmbeddingBackend, LexicalEmbedder};
    use crate::models::record::ParsedResume;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for CountingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, PipelineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1.0, 0.0])
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, PipelineError> {
            Err(PipelineError::Embedding("backend down".to_string()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn record(skills: &[&str], clean_text: &str) -> RecruiterRecord {
        RecruiterRecord {
            parsed: ParsedResume {
                file_name: "r.pdf".to_string(),
                raw: clean_text.to_string(),
                skills: skills.iter().map(|s| s.to_string()).collect(),
                names_orgs: vec![],
                locations: vec![],
                dates: vec![],
                full_text: None,
            },
            email: None,
            phone: None,
            clean_text: clean_text.to_string(),
            recruiter_score: 0,
            recruiter_feedback: String::new(),
        }
    }

    #[tokio::test]
    async fn test_empty_skills_short_circuits_without_embedding() {
        let counter = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
        });
        let stage = AnalystStage::with_embedder(MatchStrategy::Skills, counter.clone());
        let jd = JobDescription::new("Senior Python engineer with SQL and AWS");

        let out = stage.score(record(&[], "anything"), &jd).await.unwrap();
        assert_eq!(out.match_score, 0.0);
        assert!(out.matched_skills.is_empty());
        assert!(out.missing_skills.is_empty());
        assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_skills_short_circuits_under_full_text_strategy() {
        let stage = AnalystStage::with_embedder(MatchStrategy::FullText, Arc::new(FailingEmbedder));
        let jd = JobDescription::new("anything at all");
        let out = stage.score(record(&[], "python sql"), &jd).await.unwrap();
        assert_eq!(out.match_score, 0.0);
    }

    #[tokio::test]
    async fn test_skills_strategy_computes_overlap() {
        let stage = AnalystStage::with_embedder(
            MatchStrategy::Skills,
            Arc::new(LexicalEmbedder::default()),
        );
        let jd = JobDescription::new("Python, SQL and Docker.");
        let out = stage
            .score(record(&["python", "excel"], ""), &jd)
            .await
            .unwrap();
        assert_eq!(out.matched_skills, vec!["python"]);
        assert_eq!(out.missing_skills, vec!["and", "docker", "sql"]);
        assert!(out.match_score > 0.0 && out.match_score < 100.0);
    }

    #[tokio::test]
    async fn test_recruiter_fields_untouched() {
        let stage = AnalystStage::with_embedder(
            MatchStrategy::Skills,
            Arc::new(LexicalEmbedder::default()),
        );
        let jd = JobDescription::new("python sql");
        for input in [record(&["python"], "python dev"), record(&[], "no skills")] {
            let out = stage.score(input.clone(), &jd).await.unwrap();
            assert_eq!(out.recruiter, input);
        }
    }

    #[tokio::test]
    async fn test_identical_profile_scores_100() {
        let stage = AnalystStage::with_embedder(
            MatchStrategy::Skills,
            Arc::new(LexicalEmbedder::default()),
        );
        let jd = JobDescription::new("python sql");
        let out = stage.score(record(&["sql", "python"], ""), &jd).await.unwrap();
        assert_eq!(out.match_score, 100.0);
        assert_eq!(out.analyst_feedback, "Excellent alignment with job description.");
        assert!(out.missing_skills.is_empty());
    }

    #[tokio::test]
    async fn test_full_text_strategy_uses_clean_text() {
        let stage = AnalystStage::with_embedder(
            MatchStrategy::FullText,
            Arc::new(LexicalEmbedder::default()),
        );
        let jd = JobDescription::new("We need a python developer");
        let out = stage
            .score(record(&["welding"], "We need a python developer"), &jd)
            .await
            .unwrap();
        assert_eq!(out.match_score, 100.0);
        assert!(out.matched_skills.is_empty());
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates() {
        let stage = AnalystStage::with_embedder(MatchStrategy::Skills, Arc::new(FailingEmbedder));
        let jd = JobDescription::new("python");
        let err = stage.score(record(&["python"], ""), &jd).await.unwrap_err();
        assert!(matches!(err, PipelineError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_embedder_built_lazily_from_settings() {
        let stage = AnalystStage::new(
            MatchStrategy::Skills,
            EmbedderSettings {
                backend: EmbeddingBackend::Lexical,
                api_url: String::new(),
                api_key: None,
                model: String::new(),
            },
        );
        assert!(stage.embedder.get().is_none());
        let jd = JobDescription::new("python");
        stage.score(record(&["python"], ""), &jd).await.unwrap();
        assert_eq!(stage.embedder.get().map(|e| e.name()), Some("lexical"));
    }

    #[test]
    fn test_significant_words_filters_short_and_punctuation() {
        let words = significant_words("We use C++, Go and SQL! An AI role.");
        assert_eq!(words, vec!["and", "c++", "role", "sql", "use"]);
    }

    #[test]
    fn test_feedback_tiers() {
        assert_eq!(analyst_feedback(75.01), "Excellent alignment with job description.");
        assert_eq!(analyst_feedback(75.0), "Moderate alignment with job description.");
        assert_eq!(analyst_feedback(50.0), "Some relevant skills but also gaps.");
        assert_eq!(analyst_feedback(30.0), "Low skill match. Consider for other roles.");
    }

    #[test]
    fn test_scale_similarity_rounds_and_clamps() {
        assert_eq!(scale_similarity(0.123456), 12.35);
        assert_eq!(scale_similarity(-0.4), 0.0);
        assert_eq!(scale_similarity(1.0), 100.0);
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("full-text".parse::<MatchStrategy>().unwrap(), MatchStrategy::FullText);
        assert_eq!("Skills".parse::<MatchStrategy>().unwrap(), MatchStrategy::Skills);
        assert!("semantic".parse::<MatchStrategy>().is_err());
    }
}
