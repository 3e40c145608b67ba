//! Strips Markdown code fences from model output.

use std::sync::OnceLock;

use regex::Regex;

/// Three backticks plus an optional language tag glued to them (`python`, `c++`, `objective-c`).
fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"```[\w+#.-]*").expect("fence pattern is valid"))
}

/// Removes every fenced-code-block marker from `raw`, then trims it.
///
/// Total and idempotent: the result never contains three consecutive
/// backticks, so a second pass only re-trims already trimmed text.
pub fn sanitize_code(raw: &str) -> String {
    fence_pattern().replace_all(raw, "").trim().to_string()
}
