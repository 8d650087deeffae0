use std::path::{Path, PathBuf};

/// File layout of one data directory. Every stage reads the previous stage's
/// snapshot and writes its own.
#[derive(Debug, Clone)]
pub struct PipelinePaths {
    pub data_dir: PathBuf,
    pub resume_dir: PathBuf,
    pub job_description: PathBuf,
    pub parsed: PathBuf,
    pub recruiter: PathBuf,
    pub analyst: PathBuf,
    pub hr: PathBuf,
    /// Every candidate, ranked.
    pub ranked: PathBuf,
    /// Top-K view of `ranked`.
    pub shortlist: PathBuf,
}

impl PipelinePaths {
    pub fn new(data_dir: impl Into<PathBuf>, job_description: Option<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let at = |name: &str| data_dir.join(name);
        Self {
            resume_dir: at("resumes"),
            job_description: job_description
                .unwrap_or_else(|| at("job_descriptions").join("job_description.txt")),
            parsed: at("parsed_resumes.json"),
            recruiter: at("recruiter_enriched.json"),
            analyst: at("analyst_output.json"),
            hr: at("hr_output.json"),
            ranked: at("ranked_candidates.json"),
            shortlist: at("final_recommendations.json"),
            data_dir,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let p = PipelinePaths::new("/srv/data", None);
        assert_eq!(p.resume_dir, PathBuf::from("/srv/data/resumes"));
        assert_eq!(
            p.job_description,
            PathBuf::from("/srv/data/job_descriptions/job_description.txt")
        );
        assert_eq!(p.hr, PathBuf::from("/srv/data/hr_output.json"));
        assert_eq!(p.shortlist, PathBuf::from("/srv/data/final_recommendations.json"));
    }

    #[test]
    fn test_job_description_override() {
        let p = PipelinePaths::new("data", Some(PathBuf::from("/etc/jd.txt")));
        assert_eq!(p.job_description, PathBuf::from("/etc/jd.txt"));
        assert_eq!(p.data_dir(), Path::new("data"));
    }
}
