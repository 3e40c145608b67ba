//! Terminal rendering of a generation result and the archive summary.

use std::path::Path;

use docforge_core::{GenerationResult, Stage};
use sha2::{Digest, Sha256};

fn section_title(stage: Stage) -> &'static str {
    match stage {
        Stage::Code => "Code (app.py)",
        Stage::Readme => "README",
        Stage::Requirements => "Dependencies",
    }
}

/// The three outputs as titled sections, in presentation order.
pub fn render_sections(result: &GenerationResult) -> String {
    let mut out = String::new();
    for stage in Stage::ALL {
        out.push_str(&format!("===== {} =====\n", section_title(stage)));
        out.push_str(result.get(stage).trim_end());
        out.push_str("\n\n");
    }
    out
}

pub fn render_json(result: &GenerationResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

/// Hex SHA-256 of the archive bytes.
pub fn archive_digest(archive: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(archive);
    format!("{:x}", hasher.finalize())
}

pub fn archive_summary(path: &Path, archive: &[u8]) -> String {
    format!(
        "Project archive written to {} ({} bytes, sha256 {})",
        path.display(),
        archive.len(),
        archive_digest(archive)
    )
}
