//! Stage orchestration.
//!
//! Each stage reads the previous stage's snapshot from the data directory,
//! enriches every record and writes its own snapshot. Stage-level problems
//! (missing input, IO) abort the stage; per-record problems are logged and
//! the record is skipped.

pub mod paths;
pub mod snapshot;

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::embedding::{Embedder, EmbedderSettings};
use crate::errors::PipelineError;
use crate::models::record::{
    AnalystRecord, HrRecord, ParsedResume, Recommendation, RecruiterRecord,
};
use crate::parsing::extract::{DocumentExtractor, FileExtractor};
use crate::parsing::parse_document;
use crate::parsing::tagger::{EntityTagger, HeuristicTagger};
use crate::screening::analyst::{AnalystStage, JobDescription, MatchStrategy};
use crate::screening::recommender::{self, RankingWeights};
use crate::screening::{hr, recruiter};

pub use paths::PipelinePaths;
pub use snapshot::{read_snapshot, read_text, write_snapshot, write_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Parse,
    Recruiter,
    Analyst,
    Hr,
    Recommend,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Parse,
        Stage::Recruiter,
        Stage::Analyst,
        Stage::Hr,
        Stage::Recommend,
    ];
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Parse => "parse",
            Stage::Recruiter => "recruiter",
            Stage::Analyst => "analyst",
            Stage::Hr => "hr",
            Stage::Recommend => "recommend",
        };
        f.write_str(name)
    }
}

/// What one stage did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub processed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub stages: Vec<StageReport>,
}

/// Collaborators and tunables shared by every stage run.
#[derive(Clone)]
pub struct Pipeline {
    paths: PipelinePaths,
    extractor: Arc<dyn DocumentExtractor>,
    tagger: Arc<dyn EntityTagger>,
    strategy: MatchStrategy,
    embedder_settings: EmbedderSettings,
    embedder: Option<Arc<dyn Embedder>>,
    weights: RankingWeights,
    shortlist_size: usize,
    raw_preview_chars: usize,
}

impl Pipeline {
    pub fn from_config(config: &Config) -> Self {
        Self {
            paths: PipelinePaths::new(&config.data_dir, config.job_description_path.clone()),
            extractor: Arc::new(FileExtractor),
            tagger: Arc::new(HeuristicTagger),
            strategy: config.analyst_strategy,
            embedder_settings: EmbedderSettings {
                backend: config.embedding_backend,
                api_url: config.embedding_api_url.clone(),
                api_key: config.embedding_api_key.clone(),
                model: config.embedding_model.clone(),
            },
            embedder: None,
            weights: RankingWeights::default(),
            shortlist_size: config.shortlist_size,
            raw_preview_chars: config.raw_preview_chars,
        }
    }

    /// Replaces the configured embedding backend with a prebuilt one.
    #[cfg(test)]
    pub fn with_embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    #[cfg(test)]
    pub fn with_extractor(mut self, extractor: Arc<dyn DocumentExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn paths(&self) -> &PipelinePaths {
        &self.paths
    }

    pub fn shortlist_size(&self) -> usize {
        self.shortlist_size
    }

    /// Runs all five stages in order, stopping at the first stage-level error.
    pub async fn run_pipeline(&self) -> Result<RunSummary, PipelineError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!("Pipeline run {run_id} started (data dir {})", self.paths.data_dir().display());

        let mut stages = Vec::with_capacity(Stage::ALL.len());
        for stage in Stage::ALL {
            stages.push(self.run_stage(stage).await?);
        }

        let finished_at = Utc::now();
        info!(
            "Pipeline run {run_id} finished in {} ms",
            (finished_at - started_at).num_milliseconds()
        );
        Ok(RunSummary {
            run_id,
            started_at,
            finished_at,
            stages,
        })
    }

    pub async fn run_stage(&self, stage: Stage) -> Result<StageReport, PipelineError> {
        let report = match stage {
            Stage::Parse => self.run_parsing().await?,
            Stage::Recruiter => self.run_recruiter().await?,
            Stage::Analyst => self.run_analyst().await?,
            Stage::Hr => self.run_hr().await?,
            Stage::Recommend => self.run_recommender().await?,
        };
        info!(
            "Stage {stage}: {} processed, {} skipped",
            report.processed, report.skipped
        );
        Ok(report)
    }

    pub async fn run_parsing(&self) -> Result<StageReport, PipelineError> {
        let dir = self.paths.resume_dir.clone();
        let extractor = Arc::clone(&self.extractor);
        let tagger = Arc::clone(&self.tagger);
        let raw_chars = self.raw_preview_chars;

        // Extraction is CPU-bound and synchronous.
        let (parsed, skipped) = tokio::task::spawn_blocking(move || {
            parse_folder(&dir, extractor.as_ref(), tagger.as_ref(), raw_chars)
        })
        .await??;

        write_snapshot(&self.paths.parsed, &parsed).await?;
        Ok(StageReport {
            stage: Stage::Parse,
            processed: parsed.len(),
            skipped,
        })
    }

    pub async fn run_recruiter(&self) -> Result<StageReport, PipelineError> {
        let parsed: Vec<ParsedResume> = read_snapshot(&self.paths.parsed).await?;
        let enriched: Vec<RecruiterRecord> = parsed.into_iter().map(recruiter::enrich).collect();
        write_snapshot(&self.paths.recruiter, &enriched).await?;
        Ok(StageReport {
            stage: Stage::Recruiter,
            processed: enriched.len(),
            skipped: 0,
        })
    }

    pub async fn run_analyst(&self) -> Result<StageReport, PipelineError> {
        let records: Vec<RecruiterRecord> = read_snapshot(&self.paths.recruiter).await?;
        let jd = JobDescription::new(read_text(&self.paths.job_description).await?);
        if jd.significant_words.is_empty() {
            warn!(
                "Job description at {} has no significant words",
                self.paths.job_description.display()
            );
        }

        let stage = match &self.embedder {
            Some(embedder) => AnalystStage::with_embedder(self.strategy, Arc::clone(embedder)),
            None => AnalystStage::new(self.strategy, self.embedder_settings.clone()),
        };
        info!(
            "Scoring {} candidates with the {:?} strategy",
            records.len(),
            stage.strategy()
        );

        let mut scored: Vec<AnalystRecord> = Vec::with_capacity(records.len());
        let mut skipped = 0;
        for record in records {
            let file_name = record.file_name().to_string();
            match stage.score(record, &jd).await {
                Ok(r) => scored.push(r),
                Err(e) => {
                    warn!("Skipping {file_name}: {e}");
                    skipped += 1;
                }
            }
        }

        write_snapshot(&self.paths.analyst, &scored).await?;
        Ok(StageReport {
            stage: Stage::Analyst,
            processed: scored.len(),
            skipped,
        })
    }

    pub async fn run_hr(&self) -> Result<StageReport, PipelineError> {
        let records: Vec<AnalystRecord> = read_snapshot(&self.paths.analyst).await?;
        let enriched: Vec<HrRecord> = records.into_iter().map(hr::enrich).collect();
        write_snapshot(&self.paths.hr, &enriched).await?;
        Ok(StageReport {
            stage: Stage::Hr,
            processed: enriched.len(),
            skipped: 0,
        })
    }

    pub async fn run_recommender(&self) -> Result<StageReport, PipelineError> {
        let records: Vec<HrRecord> = read_snapshot(&self.paths.hr).await?;
        let ranked = recommender::rank(records, &self.weights);
        let top = recommender::shortlist(&ranked, self.shortlist_size);

        write_snapshot(&self.paths.ranked, &ranked).await?;
        write_snapshot(&self.paths.shortlist, &top).await?;
        Ok(StageReport {
            stage: Stage::Recommend,
            processed: ranked.len(),
            skipped: 0,
        })
    }

    /// The latest top-K snapshot.
    pub async fn load_shortlist(&self) -> Result<Vec<Recommendation>, PipelineError> {
        read_snapshot(&self.paths.shortlist).await
    }
}

/// Parses every regular file in `dir`, in file-name order. Returns the records
/// and how many files were skipped.
fn parse_folder(
    dir: &Path,
    extractor: &dyn DocumentExtractor,
    tagger: &dyn EntityTagger,
    raw_chars: usize,
) -> Result<(Vec<ParsedResume>, usize), PipelineError> {
    if !dir.is_dir() {
        return Err(PipelineError::MissingInput(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    let mut parsed = Vec::with_capacity(files.len());
    let mut skipped = 0;
    for path in files {
        match parse_document(&path, extractor, tagger, raw_chars) {
            Ok(record) => {
                info!("Parsed {}", record.file_name);
                parsed.push(record);
            }
            Err(e @ (PipelineError::UnsupportedFormat(_) | PipelineError::ExtractionFailure { .. })) => {
                warn!("Skipping {}: {e}", path.display());
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }
    Ok((parsed, skipped))
}
