//! Static keyword lists and the boundary-anchored matcher shared by the
//! parsing and HR stages.
//!
//! Matching is anchored on word boundaries at both ends: "gap" must not fire
//! on "Singapore", "terminated" must not fire on "unterminated".

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Technical skills detected by the parsing stage.
pub const TECH_SKILLS: &[&str] = &[
    "python",
    "sql",
    "excel",
    "pandas",
    "tensorflow",
    "aws",
    "powerbi",
    "communication",
    "django",
];

pub const SOFT_SKILLS: &[&str] = &[
    "communication",
    "teamwork",
    "team player",
    "leadership",
    "problem solving",
    "time management",
    "adaptability",
    "creativity",
    "collaboration",
];

pub const RED_FLAGS: &[&str] = &[
    "unemployed",
    "fresher",
    "terminated",
    "job hopping",
    "gap",
    "no experience",
];

/// A fixed list of phrases compiled to case-insensitive, word-boundary regexes.
pub struct KeywordSet {
    patterns: Vec<(&'static str, Regex)>,
}

impl KeywordSet {
    pub fn new(keywords: &[&'static str]) -> Self {
        let patterns = keywords
            .iter()
            .map(|&kw| {
                // Escaped literal between \b anchors always compiles.
                let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(kw)))
                    .expect("escaped keyword is a valid regex");
                (kw, re)
            })
            .collect();
        Self { patterns }
    }

    /// Returns every keyword found in `text`, de-duplicated and sorted.
    pub fn find_in(&self, text: &str) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(kw, _)| kw.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

pub static TECH_SKILL_SET: Lazy<KeywordSet> = Lazy::new(|| KeywordSet::new(TECH_SKILLS));
pub static SOFT_SKILL_SET: Lazy<KeywordSet> = Lazy::new(|| KeywordSet::new(SOFT_SKILLS));
pub static RED_FLAG_SET: Lazy<KeywordSet> = Lazy::new(|| KeywordSet::new(RED_FLAGS));
