//! HR stage: soft-skill and red-flag detection over the cleaned resume text.

use crate::keywords::{RED_FLAG_SET, SOFT_SKILL_SET};
use crate::models::record::{AnalystRecord, HrRecord};

/// `50 + 10 per soft skill - 10 per red flag`, clamped to 0–100.
pub fn score_hr(soft_skills: usize, red_flags: usize) -> u8 {
    let score = 50 + 10 * soft_skills as i64 - 10 * red_flags as i64;
    score.clamp(0, 100) as u8
}

pub fn hr_feedback(score: u8, soft_skills: &[String], red_flags: &[String]) -> String {
    let mut feedback = Vec::new();
    if !soft_skills.is_empty() {
        feedback.push(format!("Good soft skills: {}.", soft_skills.join(", ")));
    }
    if !red_flags.is_empty() {
        feedback.push(format!("Red flags: {}.", red_flags.join(", ")));
    }
    feedback.push(
        match score {
            s if s >= 80 => "Strong candidate overall.",
            s if s >= 50 => "Balanced profile. Review further.",
            _ => "Some concerns. Consider carefully.",
        }
        .to_string(),
    );
    feedback.join(" ")
}

pub fn enrich(record: AnalystRecord) -> HrRecord {
    let text = record.recruiter.clean_text.to_lowercase();
    let soft_skills = SOFT_SKILL_SET.find_in(&text);
    let red_flags = RED_FLAG_SET.find_in(&text);
    let hr_score = score_hr(soft_skills.len(), red_flags.len());
    let feedback = hr_feedback(hr_score, &soft_skills, &red_flags);

    HrRecord {
        analyst: record,
        soft_skills,
        red_flags,
        hr_score,
        hr_feedback: Some(feedback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{ParsedResume, RecruiterRecord};

    fn analyst_record(clean_text: &str) -> AnalystRecord {
        AnalystRecord {
            recruiter: RecruiterRecord {
                parsed: ParsedResume {
                    file_name: "hr.pdf".to_string(),
                    raw: clean_text.to_string(),
                    skills: vec![],
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
            },
            match_score: 33.3,
            matched_skills: vec![],
            missing_skills: vec![],
            analyst_feedback: String::new(),
        }
    }

    #[test]
    fn test_score_is_clamped_for_any_counts() {
        for soft in 0..=12 {
            for red in 0..=12 {
                let s = score_hr(soft, red);
                assert!(s <= 100, "soft={soft} red={red} score={s}");
            }
        }
        assert_eq!(score_hr(9, 0), 100);
        assert_eq!(score_hr(0, 7), 0);
        assert_eq!(score_hr(2, 1), 60);
    }

    #[test]
    fn test_never_fired_is_not_a_red_flag() {
        let r = enrich(analyst_record(
            "Experienced in Python and SQL, team player, never fired.",
        ));
        assert_eq!(r.soft_skills, vec!["team player"]);
        assert!(r.red_flags.is_empty(), "{:?}", r.red_flags);
        assert_eq!(r.hr_score, 60);
    }

    #[test]
    fn test_boundary_matching_regression() {
        let r = enrich(analyst_record(
            "Experienced in Python and SQL, team player. Prior role required relocation to Singapore.",
        ));
        assert_eq!(r.soft_skills, vec!["team player"]);
        assert!(
            r.red_flags.is_empty(),
            "substring hits inside 'required'/'Singapore' must not count: {:?}",
            r.red_flags
        );
        assert_eq!(r.hr_score, 60);
    }

    #[test]
    fn test_whole_word_red_flag_is_found() {
        let r = enrich(analyst_record("Was terminated in 2020 followed by a gap year"));
        assert_eq!(r.red_flags, vec!["gap", "terminated"]);
        assert_eq!(r.hr_score, 30);
        assert_eq!(
            r.hr_feedback.as_deref(),
            Some("Red flags: gap, terminated. Some concerns. Consider carefully.")
        );
    }

    #[test]
    fn test_feedback_strong_candidate() {
        let r = enrich(analyst_record(
            "Leadership, teamwork, communication and creativity",
        ));
        assert_eq!(r.hr_score, 90);
        assert_eq!(
            r.hr_feedback.as_deref(),
            Some("Good soft skills: communication, creativity, leadership, teamwork. Strong candidate overall.")
        );
    }

    #[test]
    fn test_neutral_text_is_balanced() {
        let r = enrich(analyst_record("Backend developer"));
        assert_eq!(r.hr_score, 50);
        assert_eq!(r.hr_feedback.as_deref(), Some("Balanced profile. Review further."));
    }

    #[test]
    fn test_analyst_fields_untouched() {
        let input = analyst_record("teamwork");
        let r = enrich(input.clone());
        assert_eq!(r.analyst, input);
    }
}
