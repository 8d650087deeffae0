//! Document text extraction for the parsing stage.

use std::panic;
use std::path::Path;

use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, Run, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};
use pdf_extract::extract_text_from_mem;

use crate::errors::PipelineError;

/// Supported resume formats, keyed by lower-cased file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }
}

/// `path -> raw text`. Implement this to plug in a different extraction service.
pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String, PipelineError>;
}

/// Reads PDFs with `pdf-extract` and DOCX files with `docx-rs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileExtractor;

impl DocumentExtractor for FileExtractor {
    fn extract(&self, path: &Path) -> Result<String, PipelineError> {
        let file = display_name(path);
        let format = DocumentFormat::from_path(path)
            .ok_or_else(|| PipelineError::UnsupportedFormat(file.clone()))?;

        let data = std::fs::read(path).map_err(|e| PipelineError::ExtractionFailure {
            file: file.clone(),
            reason: e.to_string(),
        })?;

        let result = match format {
            DocumentFormat::Pdf => extract_pdf_text(&data),
            DocumentFormat::Docx => extract_docx_text(&data),
        };
        result.map_err(|reason| PipelineError::ExtractionFailure { file, reason })
    }
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn extract_pdf_text(data: &[u8]) -> Result<String, String> {
    // pdf-extract panics on some malformed inputs; treat that like any other failure.
    match panic::catch_unwind(|| extract_text_from_mem(data)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(format!("unable to extract PDF text: {e}")),
        Err(_) => Err("PDF parser panicked on malformed input".to_string()),
    }
}

fn extract_docx_text(data: &[u8]) -> Result<String, String> {
    let docx = read_docx(data).map_err(|e| format!("unable to read DOCX: {e}"))?;
    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => push_paragraph(paragraph, &mut lines),
            DocumentChild::Table(table) => push_table(table, &mut lines),
            _ => {}
        }
    }
    Ok(lines.join("\n"))
}

fn push_paragraph(paragraph: &Paragraph, lines: &mut Vec<String>) {
    let mut buffer = String::new();
    for child in &paragraph.children {
        match child {
            ParagraphChild::Run(run) => append_run(run, &mut buffer),
            ParagraphChild::Hyperlink(link) => {
                for inner in &link.children {
                    if let ParagraphChild::Run(run) = inner {
                        append_run(run, &mut buffer);
                    }
                }
            }
            _ => {}
        }
    }
    let trimmed = buffer.trim();
    if !trimmed.is_empty() {
        lines.push(trimmed.to_string());
    }
}

fn push_table(table: &Table, lines: &mut Vec<String>) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row;
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell;
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => push_paragraph(paragraph, lines),
                    TableCellContent::Table(inner) => push_table(inner, lines),
                    _ => {}
                }
            }
        }
    }
}

fn append_run(run: &Run, buffer: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(text) => buffer.push_str(&text.text),
            RunChild::Break(_) => buffer.push('\n'),
            RunChild::Tab(_) => buffer.push('\t'),
            _ => {}
        }
    }
}
