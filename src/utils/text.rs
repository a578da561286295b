//! Text cleanup applied to bot answers before display.

use regex::Regex;
use std::sync::LazyLock;

static BOLD_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold-marker pattern"));

/// Remove markdown bold markers, keeping the text between them.
///
/// Runs on every streaming update, so unpaired markers (a bold span whose
/// closing `**` has not arrived yet) are left untouched until the pair
/// completes.
pub fn strip_bold_markers(text: &str) -> String {
    BOLD_MARKERS.replace_all(text, "$1").into_owned()
}
