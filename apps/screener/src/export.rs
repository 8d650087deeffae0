//! Shortlist presentation: candidate display names and CSV export.

use std::io::Write;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::PipelineError;
use crate::models::record::Recommendation;

const HEADINGS: &[&str] = &[
    "Professional Summary",
    "Objective",
    "Experience",
    "Skills",
    "Education",
];

static FULL_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z]+ [A-Z][a-z]+$").expect("valid name regex"));

pub const CSV_HEADER: [&str; 8] = [
    "Candidate",
    "Email",
    "Phone",
    "Skills",
    "Match %",
    "Soft Skills",
    "Red Flags",
    "Final Score",
];

/// First of the first five lines that reads as "First Last", else `fallback`.
pub fn candidate_name(raw: &str, fallback: &str) -> String {
    raw.trim()
        .lines()
        .take(5)
        .map(str::trim)
        .filter(|line| !HEADINGS.contains(line))
        .find(|line| FULL_NAME_RE.is_match(line))
        .unwrap_or(fallback)
        .to_string()
}

/// Writes the shortlist as CSV, one row per candidate in rank order.
pub fn write_shortlist_csv<W: Write>(
    writer: W,
    shortlist: &[Recommendation],
) -> Result<(), PipelineError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;

    for rec in shortlist {
        let parsed = rec.hr.parsed();
        let recruiter = rec.hr.recruiter();
        let red_flags = if rec.hr.red_flags.is_empty() {
            "None".to_string()
        } else {
            rec.hr.red_flags.join(", ")
        };
        csv.write_record([
            candidate_name(&parsed.raw, &parsed.file_name),
            recruiter.email.clone().unwrap_or_default(),
            recruiter.phone.clone().unwrap_or_default(),
            parsed.skills.join(", "),
            rec.hr.analyst.match_score.to_string(),
            rec.hr.soft_skills.join(", "),
            red_flags,
            rec.recommendation_score.to_string(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Renders the shortlist CSV into memory.
pub fn shortlist_csv(shortlist: &[Recommendation]) -> Result<String, PipelineError> {
    let mut buf = Vec::new();
    write_shortlist_csv(&mut buf, shortlist)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
