//! Entity and skill tagging.
//!
//! `HeuristicTagger` is rule-based: regexes for dates and `City, ST` locations,
//! capitalized word runs for names and organisations, and the fixed technical
//! skill list for skills. Swap in a model-backed tagger through `EntityTagger`.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::keywords::{TECH_SKILLS, TECH_SKILL_SET};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaggedEntities {
    pub names_orgs: Vec<String>,
    pub locations: Vec<String>,
    pub dates: Vec<String>,
    /// Lower-cased, unique, sorted.
    pub skills: Vec<String>,
}

/// `text -> {names_orgs, locations, dates, skills}`.
pub trait EntityTagger: Send + Sync {
    fn tag(&self, text: &str) -> TaggedEntities;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicTagger;

/// Section headings that look like proper names but are not.
const HEADINGS: &[&str] = &[
    "professional summary",
    "summary",
    "objective",
    "experience",
    "work experience",
    "professional experience",
    "skills",
    "technical skills",
    "education",
    "projects",
    "certifications",
    "contact",
    "references",
];

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        \b(?i:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?
            |sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+(?:19|20)\d{2}\b
        | \b(?:0?[1-9]|1[0-2])/(?:19|20)\d{2}\b
        | \b(?:19[5-9]\d|20\d{2})\b
        | \bPresent\b",
    )
    .expect("valid date regex")
});

static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?: [A-Z][a-z]+)?, (?:[A-Z]{2}|[A-Z][a-z]+(?: [A-Z][a-z]+)?)\b")
        .expect("valid location regex")
});

static NAME_ORG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][A-Za-z&.]+(?: [A-Z][A-Za-z&.]+){1,3}\b").expect("valid name regex")
});

impl EntityTagger for HeuristicTagger {
    fn tag(&self, text: &str) -> TaggedEntities {
        let dates = unique(DATE_RE.find_iter(text).map(|m| m.as_str().to_string()));

        let locations = unique(
            LOCATION_RE
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .filter(|loc| !mentions_known_term(loc)),
        );

        let names_orgs = unique(
            text.lines()
                .flat_map(|line| NAME_ORG_RE.find_iter(line))
                .map(|m| m.as_str().trim_end_matches('.').to_string())
                .filter(|n| !is_heading(n) && !mentions_known_term(n))
                .filter(|n| !locations.iter().any(|loc| loc.contains(n.as_str()))),
        );

        TaggedEntities {
            names_orgs,
            locations,
            dates,
            skills: TECH_SKILL_SET.find_in(text),
        }
    }
}

fn is_heading(candidate: &str) -> bool {
    HEADINGS.contains(&candidate.to_lowercase().as_str())
}

/// True when any word is a technical skill or heading word ("Python, Django" is not a place).
fn mentions_known_term(candidate: &str) -> bool {
    candidate
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .any(|w| {
            let w = w.to_lowercase();
            TECH_SKILLS.contains(&w.as_str()) || HEADINGS.contains(&w.as_str())
        })
}

/// Keeps first occurrences, in order.
fn unique(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.filter(|i| seen.insert(i.clone())).collect()
}
