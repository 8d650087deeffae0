//! Parsing stage: raw documents to `ParsedResume` records.
//! Extraction and tagging sit behind traits; this module only glues them.

pub mod extract;
pub mod tagger;

use std::path::Path;

use crate::errors::PipelineError;
use crate::models::record::ParsedResume;

use self::extract::{display_name, DocumentExtractor};
use self::tagger::EntityTagger;

/// Builds a record from already-extracted text.
pub fn parse_text(
    file_name: String,
    text: &str,
    tagger: &dyn EntityTagger,
    raw_chars: usize,
) -> ParsedResume {
    let tags = tagger.tag(text);
    ParsedResume {
        file_name,
        raw: text.chars().take(raw_chars).collect(),
        skills: tags.skills,
        names_orgs: tags.names_orgs,
        locations: tags.locations,
        dates: tags.dates,
        full_text: None,
    }
}

pub fn parse_document(
    path: &Path,
    extractor: &dyn DocumentExtractor,
    tagger: &dyn EntityTagger,
    raw_chars: usize,
) -> Result<ParsedResume, PipelineError> {
    let text = extractor.extract(path)?;
    Ok(parse_text(display_name(path), &text, tagger, raw_chars))
}
