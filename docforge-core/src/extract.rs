//! Text extractor for uploaded `.docx` documents.
//!
//! A `.docx` file is a zip container; its text lives in `word/document.xml`
//! plus optional header and footer parts. Text is collected the way docx2txt
//! does it:
//!   - headers (`word/header*.xml`), the main document, then footers
//!     (`word/footer*.xml`), each group in name order
//!   - `w:t` contributes its text, run-level `w:tab` a tab, `w:br`/`w:cr` a
//!     newline, and every paragraph start (`w:p`) a blank line
//!   - the final string is trimmed
//!
//! Uploaded bytes are staged into a temporary file ([`UploadedDocument`]) that
//! is removed when extraction finishes, whether it succeeded or not.

use std::fs::File;
use std::io::{BufReader, Read, Seek, Write};
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::ExtractionError;

pub const DOCUMENT_PART: &str = "word/document.xml";

fn xml_token_pattern() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(r"<(/?)([^\s/>?!]*)[^>]*?(/?)>|([^<]+)").expect("xml token pattern is valid")
    })
}

fn entity_pattern() -> &'static Regex {
    static ENTITY: OnceLock<Regex> = OnceLock::new();
    ENTITY.get_or_init(|| {
        Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|lt|gt|amp|quot|apos);")
            .expect("entity pattern is valid")
    })
}

fn header_pattern() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| Regex::new(r"^word/header\d*\.xml$").expect("header pattern is valid"))
}

fn footer_pattern() -> &'static Regex {
    static FOOTER: OnceLock<Regex> = OnceLock::new();
    FOOTER.get_or_init(|| Regex::new(r"^word/footer\d*\.xml$").expect("footer pattern is valid"))
}

/// Uploaded document bytes staged on disk for the duration of one extraction.
pub struct UploadedDocument {
    file: NamedTempFile,
}

impl UploadedDocument {
    /// Writes `bytes` to a fresh temporary `.docx` file.
    pub fn stage(bytes: &[u8]) -> Result<Self, ExtractionError> {
        let mut file = tempfile::Builder::new()
            .prefix("docforge-upload-")
            .suffix(".docx")
            .tempfile()
            .map_err(|e| {
                error!(error = ?e, "[EXTRACT][ERROR] Failed to create temp file for upload");
                ExtractionError::Io(e)
            })?;
        file.write_all(bytes)?;
        file.flush()?;
        debug!(path = %file.path().display(), size = bytes.len(), "[EXTRACT] Staged upload");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Extracts the text and removes the staged file on every exit path.
    pub fn extract_text(self) -> Result<String, ExtractionError> {
        let result = extract_text(self.file.path());
        let path = self.file.path().to_path_buf();
        if let Err(e) = self.file.close() {
            warn!(error = ?e, path = %path.display(), "[EXTRACT] Failed to remove staged upload");
        }
        result
    }
}

/// Stages `bytes` and extracts them on the blocking thread pool.
pub async fn extract_upload(bytes: Vec<u8>) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || UploadedDocument::stage(&bytes)?.extract_text())
        .await
        .map_err(|e| {
            error!(error = ?e, "[EXTRACT][ERROR] Extraction task did not complete");
            ExtractionError::Interrupted(e.to_string())
        })?
}

/// Reads the `.docx` at `path` and returns its plain text.
pub fn extract_text(path: &Path) -> Result<String, ExtractionError> {
    info!(path = %path.display(), "[EXTRACT] Reading document");
    let file = File::open(path).map_err(|e| {
        error!(error = ?e, path = %path.display(), "[EXTRACT][ERROR] Failed to open document");
        ExtractionError::Io(e)
    })?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| {
        error!(error = ?e, path = %path.display(), "[EXTRACT][ERROR] Not a zip container");
        ExtractionError::InvalidArchive(e)
    })?;

    let mut headers: Vec<String> = Vec::new();
    let mut footers: Vec<String> = Vec::new();
    for name in archive.file_names() {
        if header_pattern().is_match(name) {
            headers.push(name.to_owned());
        } else if footer_pattern().is_match(name) {
            footers.push(name.to_owned());
        }
    }
    headers.sort();
    footers.sort();

    let mut text = String::new();
    for part in &headers {
        text.push_str(&xml_to_text(&read_part(&mut archive, part)?));
    }
    text.push_str(&xml_to_text(&read_part(&mut archive, DOCUMENT_PART)?));
    for part in &footers {
        text.push_str(&xml_to_text(&read_part(&mut archive, part)?));
    }

    let text = text.trim().to_string();
    info!(
        headers = headers.len(),
        footers = footers.len(),
        chars = text.chars().count(),
        "[EXTRACT] Document text extracted"
    );
    Ok(text)
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, ExtractionError> {
    let mut entry = archive.by_name(name).map_err(|e| match e {
        ZipError::FileNotFound => {
            error!(part = name, "[EXTRACT][ERROR] Document part missing");
            ExtractionError::MissingDocumentPart(name.to_owned())
        }
        other => ExtractionError::InvalidArchive(other),
    })?;
    let mut raw = Vec::new();
    entry.read_to_end(&mut raw)?;
    String::from_utf8(raw).map_err(|source| ExtractionError::Encoding {
        part: name.to_owned(),
        source,
    })
}

/// Converts one WordprocessingML part to text.
pub fn xml_to_text(xml: &str) -> String {
    let mut out = String::new();
    let mut in_text = false;
    let mut in_tab_stops = false;

    for caps in xml_token_pattern().captures_iter(xml) {
        if let Some(chunk) = caps.get(4) {
            if in_text {
                out.push_str(&decode_entities(chunk.as_str()));
            }
            continue;
        }
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let self_closing = caps.get(3).is_some_and(|m| !m.as_str().is_empty());
        let name = caps.get(2).map_or("", |m| m.as_str());

        match (name, closing) {
            ("w:t", false) => in_text = !self_closing,
            ("w:t", true) => in_text = false,
            ("w:tabs", false) => in_tab_stops = !self_closing,
            ("w:tabs", true) => in_tab_stops = false,
            ("w:tab", false) if !in_tab_stops => out.push('\t'),
            ("w:br", false) | ("w:cr", false) => out.push('\n'),
            ("w:p", false) => out.push_str("\n\n"),
            _ => {}
        }
    }
    out
}

fn decode_entities(text: &str) -> String {
    entity_pattern()
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            match entity {
                "lt" => "<".to_string(),
                "gt" => ">".to_string(),
                "amp" => "&".to_string(),
                "quot" => "\"".to_string(),
                "apos" => "'".to_string(),
                _ => {
                    let code = match entity.strip_prefix("#x") {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => entity[1..].parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                        .map(String::from)
                        .unwrap_or_else(|| caps[0].to_string())
                }
            }
        })
        .into_owned()
}
