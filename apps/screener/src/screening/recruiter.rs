//! Recruiter stage: contact extraction and completeness scoring.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::record::{ParsedResume, RecruiterRecord};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+").expect("valid email regex")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d[\d\s-]{8,}\d").expect("valid phone regex"));

/// First email-shaped substring, if any.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// First run of 10+ characters of digits, spaces and hyphens that starts and ends
/// with a digit, optionally `+`-prefixed. Separators count toward the length.
pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_RE.find(text).map(|m| m.as_str().to_string())
}

/// Collapses every whitespace run to a single space and trims the ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 50 points per contact channel found.
pub fn compute_recruiter_score(email: Option<&str>, phone: Option<&str>) -> u8 {
    let mut score = 0;
    if email.is_some() {
        score += 50;
    }
    if phone.is_some() {
        score += 50;
    }
    score
}

pub fn recruiter_feedback(score: u8, email: Option<&str>, phone: Option<&str>) -> String {
    let mut feedback = Vec::new();
    if email.is_none() {
        feedback.push("Missing email.");
    }
    if phone.is_none() {
        feedback.push("Missing phone number.");
    }
    feedback.push(match score {
        100 => "Contact info complete.",
        s if s >= 50 => "Partial contact info available.",
        _ => "No contact details found.",
    });
    feedback.join(" ")
}

/// Enriches a parsed resume with contact fields. Never fails: absent matches
/// become `None`.
pub fn enrich(parsed: ParsedResume) -> RecruiterRecord {
    let text = parsed.source_text();
    let email = extract_email(text);
    let phone = extract_phone(text);
    let clean = clean_text(text);
    let score = compute_recruiter_score(email.as_deref(), phone.as_deref());
    let feedback = recruiter_feedback(score, email.as_deref(), phone.as_deref());

    RecruiterRecord {
        parsed,
        email,
        phone,
        clean_text: clean,
        recruiter_score: score,
        recruiter_feedback: feedback,
    }
}
